use promptline_normalizer::cjk::{cjk_script, CjkScript};
use std::collections::HashSet;

/// Characters that may appear inside a Latin token (`c++`, `c#`, `.net`, `x-ray`)
const LATIN_JOINERS: &[char] = &['+', '.', '#', '-'];

/// Token set used for keyword matching
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    set: HashSet<String>,
}

impl Tokens {
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.set.contains(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.set.iter().map(String::as_str)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Latin,
    Cjk(CjkScript),
}

fn run_kind(c: char) -> Option<RunKind> {
    if let Some(script) = cjk_script(c) {
        return Some(RunKind::Cjk(script));
    }
    if c.is_alphanumeric() || LATIN_JOINERS.contains(&c) {
        return Some(RunKind::Latin);
    }
    None
}

/// Script-aware tokenization.
///
/// Latin runs become lowercase tokens plus bigrams of adjacent tokens. Each
/// same-script CJK run contributes itself, its characters and its sliding
/// character bigrams.
#[must_use]
pub fn tokenize(text: &str) -> Tokens {
    let mut set = HashSet::new();
    let mut latin: Vec<String> = Vec::new();

    let mut current = String::new();
    let mut kind: Option<RunKind> = None;
    for c in text.chars() {
        let next = run_kind(c);
        if next != kind && !current.is_empty() {
            flush(kind, &current, &mut set, &mut latin);
            current.clear();
        }
        kind = next;
        if next.is_some() {
            current.push(c);
        }
    }
    if !current.is_empty() {
        flush(kind, &current, &mut set, &mut latin);
    }

    for pair in latin.windows(2) {
        set.insert(format!("{} {}", pair[0], pair[1]));
    }
    set.extend(latin);
    Tokens { set }
}

fn flush(kind: Option<RunKind>, run: &str, set: &mut HashSet<String>, latin: &mut Vec<String>) {
    match kind {
        Some(RunKind::Latin) => {
            let token = run.trim_end_matches('.').to_lowercase();
            if token.chars().any(char::is_alphanumeric) {
                latin.push(token);
            }
        }
        Some(RunKind::Cjk(_)) => {
            let chars: Vec<char> = run.chars().collect();
            set.insert(run.to_string());
            for c in &chars {
                set.insert(c.to_string());
            }
            for pair in chars.windows(2) {
                set.insert(pair.iter().collect());
            }
        }
        None => {}
    }
}
