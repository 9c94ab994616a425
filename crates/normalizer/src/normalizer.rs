use crate::config::NormalizerConfig;
use crate::outline::build_outline;
use crate::prose;
use crate::segment::{split_segments, strip_code, Segment};
use promptline_protocol::Outline;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Appended when the normalized text exceeds the length ceiling
pub const TRUNCATION_MARKER: &str = "\n…[truncated]";

/// Punctuation that does not block the short-text merge
const MERGE_WHITELIST: &[char] = &[',', '\'', '"', '(', ')', '-'];

const MAX_MERGE_LINES: usize = 4;

/// Result of normalizing one message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normalized {
    pub text: String,
    pub outline: Outline,
    /// `|len(text) - len(raw)| / len(raw)` in chars, 0 for empty input
    pub change_ratio: f64,
    pub has_code: bool,
}

struct Piece<'a> {
    code: bool,
    text: Cow<'a, str>,
}

/// Code-preserving text normalizer
#[derive(Debug, Clone)]
pub struct Normalizer {
    char_limit: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl Normalizer {
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            char_limit: config.effective_limit(),
        }
    }

    #[must_use]
    pub const fn char_limit(&self) -> usize {
        self.char_limit
    }

    /// Normalize a raw message. Never fails; empty input gives empty output.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> Normalized {
        if raw.is_empty() {
            return Normalized::default();
        }

        let pieces: Vec<Piece<'_>> = split_segments(raw)
            .into_iter()
            .map(|segment| match segment {
                Segment::Code(code) => Piece {
                    code: true,
                    text: Cow::Borrowed(code),
                },
                Segment::Prose(text) => Piece {
                    code: false,
                    text: Cow::Owned(prose::clean(text)),
                },
            })
            .collect();
        let has_code = pieces.iter().any(|p| p.code);

        let mut text = tidy(&pieces);
        if !has_code {
            if let Some(merged) = merge_short_text(&text) {
                text = merged;
            }
        }

        let outline = build_outline(&strip_code(&text));
        let text = enforce_limit(text, self.char_limit);

        let raw_len = raw.chars().count();
        let change_ratio = if raw_len == 0 {
            0.0
        } else {
            text.chars().count().abs_diff(raw_len) as f64 / raw_len as f64
        };

        log::debug!(
            "Normalized {} chars -> {} chars (change ratio {:.3}, code: {})",
            raw_len,
            text.chars().count(),
            change_ratio,
            has_code
        );

        Normalized {
            text,
            outline,
            change_ratio,
            has_code,
        }
    }
}

/// Cross-segment pass: line-level cleanup of prose with code kept verbatim.
fn tidy(pieces: &[Piece<'_>]) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = String::new();
    let last = pieces.len().saturating_sub(1);

    for (idx, piece) in pieces.iter().enumerate() {
        if piece.code {
            out.push_str(&piece.text);
            continue;
        }
        let after_code = idx > 0;
        let before_code = idx < last;
        out.push_str(&tidy_prose(&piece.text, &mut seen, after_code, before_code));
    }
    out
}

/// The first line of a prose piece that follows code shares its line with the
/// closing fence; the last line of a piece followed by code shares its line
/// with the opening fence. Those glued lines are never dropped.
fn tidy_prose(text: &str, seen: &mut HashSet<String>, after_code: bool, before_code: bool) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let count = lines.len();
    let mut kept: Vec<(String, bool)> = Vec::with_capacity(count);

    for (idx, line) in lines.into_iter().enumerate() {
        let is_last = idx + 1 == count;
        let glued = (idx == 0 && after_code) || (is_last && before_code);

        let mut line = collapse_repeated_words(&squeeze_spaces(line));
        if !(is_last && before_code) {
            line.truncate(line.trim_end().len());
        }

        let key = line.trim().to_lowercase();
        if !key.is_empty() && !seen.insert(key) && !glued {
            continue;
        }
        kept.push((line, glued));
    }

    let mut result: Vec<String> = Vec::with_capacity(kept.len());
    let mut prev_blank = false;
    for (line, glued) in kept {
        let blank = !glued && line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        prev_blank = blank;
        result.push(line);
    }

    if !after_code {
        let leading = result.iter().take_while(|l| l.trim().is_empty()).count();
        result.drain(..leading);
    }
    if !before_code {
        while result.last().is_some_and(|l| l.trim().is_empty()) {
            result.pop();
        }
    }
    result.join("\n")
}

/// Collapse runs of spaces/tabs after the leading indentation.
fn squeeze_spaces(line: &str) -> String {
    let body_start = line.len() - line.trim_start_matches([' ', '\t']).len();
    let (indent, body) = line.split_at(body_start);
    let mut out = String::with_capacity(line.len());
    out.push_str(indent);
    let mut prev_space = false;
    for c in body.chars() {
        let space = c == ' ' || c == '\t';
        if space && prev_space {
            continue;
        }
        out.push(if space { ' ' } else { c });
        prev_space = space;
    }
    out
}

/// "the the cat" → "the cat"; only purely alphabetic words are compared.
fn collapse_repeated_words(line: &str) -> String {
    let body_start = line.len() - line.trim_start_matches([' ', '\t']).len();
    let (indent, body) = line.split_at(body_start);
    let mut words: Vec<&str> = Vec::new();
    for word in body.split(' ') {
        let repeated = !word.is_empty()
            && word.chars().all(char::is_alphabetic)
            && words
                .last()
                .is_some_and(|prev| prev.to_lowercase() == word.to_lowercase());
        if !repeated {
            words.push(word);
        }
    }
    format!("{indent}{}", words.join(" "))
}

/// Join one to four punctuation-free lines into a single capitalized sentence.
fn merge_short_text(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() || lines.len() > MAX_MERGE_LINES {
        return None;
    }
    let plain = lines.iter().all(|line| {
        line.chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || MERGE_WHITELIST.contains(&c))
    });
    if !plain {
        return None;
    }

    let mut joined = String::with_capacity(text.len());
    for line in lines {
        if let Some((before, after)) = joined.chars().next_back().zip(line.chars().next()) {
            if !prose::is_unspaced_boundary(before, after) {
                joined.push(' ');
            }
        }
        joined.push_str(line);
    }
    let mut chars = joined.chars();
    let merged = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    };
    Some(merged)
}

/// Truncate on a grapheme boundary so that text plus marker fits `limit`.
fn enforce_limit(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let budget = limit.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut out = String::with_capacity(text.len().min(limit * 4));
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.chars().count();
        if used + width > budget {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.truncate(out.trim_end().len());
    log::debug!("Normalized text truncated to {} chars", used);
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use promptline_protocol::OutlineBucket;

    fn normalize(raw: &str) -> Normalized {
        Normalizer::default().normalize(raw)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = normalize("");
        assert_eq!(out, Normalized::default());
        assert!(out.outline.is_empty());
    }

    #[test]
    fn scenario_apples_and_url() {
        let out = normalize("i like teh apples!! see https://a.b");
        assert!(out.text.starts_with("I "), "got {:?}", out.text);
        assert!(out.text.contains("apples!"));
        assert!(!out.text.contains("!!"));
        assert!(out.text.contains("https://a.b"));
    }

    #[test]
    fn code_fences_pass_through_byte_identical() {
        let code = "```python\nprint( 'hi' )!!\n\n\n\nx  =  1\n```";
        let raw = format!("please   fix this!!\n{code}\nthanks thanks");
        let out = normalize(&raw);
        assert!(out.text.contains(code));
        assert!(out.has_code);
        assert!(out.text.starts_with("please fix this!\n```python"));
        assert!(out.text.ends_with("```\nthanks"));
    }

    #[test]
    fn drops_duplicate_lines_case_insensitively() {
        let out = normalize("Deploy fails on Monday.\nIt is slow.\ndeploy fails on monday.\nIt is slow.\nWhy?");
        assert_eq!(out.text, "Deploy fails on Monday.\nIt is slow.\nWhy?");
    }

    #[test]
    fn collapses_blank_line_runs() {
        let out = normalize("First line.\n\n\n\nSecond line.\n\n\nThird line.\nFourth.\nFifth.");
        assert_eq!(
            out.text,
            "First line.\n\nSecond line.\n\nThird line.\nFourth.\nFifth."
        );
    }

    #[test]
    fn collapses_repeated_words() {
        let out = normalize("Check the the logs, then then restart it. Again.");
        assert_eq!(out.text, "Check the logs, then restart it. Again.");
    }

    #[test]
    fn merges_short_plain_lines() {
        let out = normalize("hello\nhow are you\n");
        assert_eq!(out.text, "Hello how are you");
    }

    #[test]
    fn merges_cjk_lines_without_spaces() {
        assert_eq!(normalize("你好\n世界").text, "你好世界");
        assert_eq!(normalize("hello\n世界").text, "Hello世界");
        assert_eq!(normalize("안녕\n하세요").text, "안녕 하세요");
    }

    #[test]
    fn does_not_merge_punctuated_or_long_text() {
        let out = normalize("hello.\nworld");
        assert_eq!(out.text, "hello.\nworld");
        let out = normalize("a\nb\nc\nd\ne");
        assert_eq!(out.text, "a\nb\nc\nd\ne");
    }

    #[test]
    fn enforces_clamped_limit_with_marker() {
        let normalizer = Normalizer::new(NormalizerConfig { char_limit: 10 });
        assert_eq!(normalizer.char_limit(), 2000);
        let raw = "word. ".repeat(1000);
        let out = normalizer.normalize(&raw);
        assert!(out.text.chars().count() <= 2000);
        assert!(out.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn reports_change_ratio() {
        let out = normalize("Hi!!!!");
        assert_eq!(out.text, "Hi!");
        assert!((out.change_ratio - 0.5).abs() < 1e-9);
        assert_eq!(normalize("Fine.").change_ratio, 0.0);
    }

    #[test]
    fn builds_outline_from_prose_only() {
        let out = normalize(
            "We use Axum.\nAdd a health endpoint.\n```rust\nfn must_not_count() {}\n```\nReturn JSON only.",
        );
        assert_eq!(
            out.outline.get(&OutlineBucket::Tasks),
            Some(&vec!["Add a health endpoint.".to_string()])
        );
        assert_eq!(
            out.outline.get(&OutlineBucket::Constraints),
            Some(&vec!["Return JSON only.".to_string()])
        );
        assert_eq!(
            out.outline.get(&OutlineBucket::Context),
            Some(&vec!["We use Axum.".to_string()])
        );
    }
}
