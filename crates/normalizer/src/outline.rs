use promptline_protocol::{Outline, OutlineBucket};

/// Imperative openers that make a sentence a task
const TASK_PREFIXES: &[&str] = &[
    "please", "write", "create", "build", "implement", "generate", "explain", "fix", "add",
    "make", "list", "summarize", "summarise", "translate", "convert", "refactor", "design",
    "describe", "show", "find", "help", "compare", "review", "optimize", "rewrite", "draft",
    "can you", "could you", "would you", "tell me",
    "请", "帮我", "帮忙", "写", "生成", "解释", "实现", "修复", "翻译", "总结", "列出", "给我",
];

/// Obligation and prohibition markers
const CONSTRAINT_MARKERS: &[&str] = &[
    "must", "should", "do not", "don't", "never", "only", "avoid", "without", "at most",
    "at least", "no more than", "required", "make sure",
    "必须", "不要", "不能", "禁止", "只能", "避免", "务必", "不得",
];

/// Markers describing the expected shape of the answer
const OUTPUT_MARKERS: &[&str] = &[
    "format", "output", "return", "respond", "reply", "json", "markdown", "table", "bullet",
    "list of", "csv", "yaml",
    "格式", "输出", "返回", "表格", "列表",
];

fn is_sentence_break(c: char) -> bool {
    matches!(c, '!' | '?' | ';' | '\n' | '。' | '！' | '？' | '；')
}

/// Split prose into trimmed, non-empty sentences.
///
/// A `.` only ends a sentence when followed by whitespace or the end of the
/// text, so version numbers and URLs stay whole.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let ends = is_sentence_break(c)
            || (c == '.' && chars.peek().map_or(true, |next| next.is_whitespace()));
        if c != '\n' {
            current.push(c);
        }
        if ends {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// ASCII needles must sit on word boundaries; CJK needles match anywhere.
fn find_term(haystack: &str, needle: &str) -> Option<usize> {
    if !needle.is_ascii() {
        return haystack.find(needle);
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let left_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let right_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if left_ok && right_ok {
            return Some(start);
        }
        from = start + needle.len();
    }
    None
}

fn strip_leading_punctuation(sentence: &str) -> &str {
    sentence.trim_start_matches(|c: char| !c.is_alphanumeric())
}

/// Assign a sentence to exactly one outline bucket; first match wins.
#[must_use]
pub fn classify_sentence(sentence: &str) -> OutlineBucket {
    let lowered = sentence.to_lowercase();
    let head = strip_leading_punctuation(&lowered);

    if TASK_PREFIXES
        .iter()
        .any(|prefix| find_term(head, prefix) == Some(0))
    {
        return OutlineBucket::Tasks;
    }
    if CONSTRAINT_MARKERS
        .iter()
        .any(|marker| find_term(&lowered, marker).is_some())
    {
        return OutlineBucket::Constraints;
    }
    if OUTPUT_MARKERS
        .iter()
        .any(|marker| find_term(&lowered, marker).is_some())
    {
        return OutlineBucket::Output;
    }
    OutlineBucket::Context
}

/// Classify every sentence of `prose` into the outline.
#[must_use]
pub fn build_outline(prose: &str) -> Outline {
    let mut outline = Outline::new();
    for sentence in split_sentences(prose) {
        outline
            .entry(classify_sentence(&sentence))
            .or_default()
            .push(sentence);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_terminators_and_newlines() {
        let sentences = split_sentences("Fix the bug. Use v1.2 only!\nKeep it short；谢谢。好");
        assert_eq!(
            sentences,
            vec![
                "Fix the bug.",
                "Use v1.2 only!",
                "Keep it short；",
                "谢谢。",
                "好",
            ]
        );
    }

    #[test]
    fn classifies_each_bucket() {
        assert_eq!(classify_sentence("Write a parser for TOML."), OutlineBucket::Tasks);
        assert_eq!(classify_sentence("Please help"), OutlineBucket::Tasks);
        assert_eq!(classify_sentence("It must not allocate."), OutlineBucket::Constraints);
        assert_eq!(classify_sentence("不要使用全局变量"), OutlineBucket::Constraints);
        assert_eq!(classify_sentence("Answer in JSON."), OutlineBucket::Output);
        assert_eq!(classify_sentence("I have a Rust service."), OutlineBucket::Context);
    }

    #[test]
    fn task_prefix_requires_word_boundary() {
        assert_eq!(classify_sentence("Fixtures are loaded lazily."), OutlineBucket::Context);
        assert_eq!(classify_sentence("Commonly used."), OutlineBucket::Context);
    }

    #[test]
    fn first_matching_bucket_wins() {
        // Imperative and constraint at once: the task bucket comes first.
        assert_eq!(
            classify_sentence("Write it without unsafe code."),
            OutlineBucket::Tasks
        );
    }

    #[test]
    fn outline_keeps_sentence_order_per_bucket() {
        let outline = build_outline("We run Postgres. Add an index. Add a test. Output as a table.");
        assert_eq!(
            outline.get(&OutlineBucket::Tasks).cloned().unwrap_or_default(),
            vec!["Add an index.", "Add a test."]
        );
        assert_eq!(outline.get(&OutlineBucket::Context).map(Vec::len), Some(1));
        assert_eq!(outline.get(&OutlineBucket::Output).map(Vec::len), Some(1));
        assert!(!outline.contains_key(&OutlineBucket::Constraints));
    }

    #[test]
    fn empty_prose_gives_empty_outline() {
        assert!(build_outline("  \n ").is_empty());
    }
}
