use crate::cjk::{is_cjk_punctuation, is_unspaced_cjk};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").expect("url pattern must compile")
});

// An "i" at the start of the text, of a line, or after a sentence terminator.
// Whether it stands alone is decided by the character that follows.
static LONE_I_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^[ \t]*|[.!?][ \t]+|[。！？\n][ \t]*)i").expect("lone-i pattern must compile")
});

const LONE_I_TRAILING: &[char] = &['\'', ',', ';', ':', '!', '?'];

/// Punctuation that trails a URL in prose rather than belonging to it
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

const COLLAPSIBLE_ASCII: &[char] = &['!', '?', ',', ';'];

/// Character-level cleanup of a single prose span.
pub(crate) fn clean(text: &str) -> String {
    let folded: String = text.nfc().filter(|c| keep_char(*c)).map(fold_char).collect();
    let collapsed = map_outside_urls(&folded, collapse_punctuation);
    let capitalized = capitalize_lone_i(&collapsed);
    tighten_cjk_spacing(&capitalized)
}

/// Uppercase sentence-initial "i". The following character is only
/// inspected, so "i! i" capitalizes both.
fn capitalize_lone_i(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in LONE_I_RE.find_iter(text) {
        let alone = text[m.end()..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || LONE_I_TRAILING.contains(&c));
        if alone {
            let at = m.end() - 1;
            out.push_str(&text[cursor..at]);
            out.push('I');
            cursor = m.end();
        }
    }
    out.push_str(&text[cursor..]);
    out
}

fn keep_char(c: char) -> bool {
    if matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    ) {
        return false;
    }
    !c.is_control() || c == '\n' || c == '\t'
}

fn fold_char(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{FF02}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{FF07}' => '\'',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => '-',
        other => other,
    }
}

/// Apply `f` to every stretch of `text` that is not part of a URL.
pub(crate) fn map_outside_urls(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in URL_RE.find_iter(text) {
        let url = m.as_str().trim_end_matches(URL_TRAILING);
        out.push_str(&f(&text[cursor..m.start()]));
        out.push_str(url);
        cursor = m.start() + url.len();
    }
    out.push_str(&f(&text[cursor..]));
    out
}

fn collapse_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '.' {
            let mut run = 1;
            while chars.peek() == Some(&'.') {
                chars.next();
                run += 1;
            }
            if run >= 4 {
                out.push_str("...");
            } else {
                out.extend(std::iter::repeat('.').take(run));
            }
            prev = Some('.');
            continue;
        }

        let collapsible = COLLAPSIBLE_ASCII.contains(&c) || is_cjk_punctuation(c);
        if collapsible && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn is_latin_alnum(c: char) -> bool {
    c.is_ascii_alphanumeric() || (c.is_alphabetic() && u32::from(c) < 0x0250)
}

/// Whether a space between `before` and `after` is dropped.
pub(crate) fn is_unspaced_boundary(before: char, after: char) -> bool {
    (is_unspaced_cjk(before) && (is_unspaced_cjk(after) || is_latin_alnum(after)))
        || (is_latin_alnum(before) && is_unspaced_cjk(after))
}

/// Drop spaces and tabs between two CJK characters or at a CJK/Latin
/// boundary. Newlines are kept.
fn tighten_cjk_spacing(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != ' ' && c != '\t' {
            out.push(c);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
            i += 1;
        }
        let before = run_start.checked_sub(1).map(|idx| chars[idx]);
        let after = chars.get(i).copied();

        let drop = match (before, after) {
            (Some(b), Some(a)) => is_unspaced_boundary(b, a),
            _ => false,
        };
        if !drop {
            out.extend(&chars[run_start..i]);
        }
    }
    out
}
