/// Code fence delimiter
pub const FENCE: &str = "```";

/// A slice of the input that is either fenced code or free prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    /// Includes both fence delimiters (only the opening one when unclosed)
    Code(&'a str),
}

impl<'a> Segment<'a> {
    #[must_use]
    pub const fn text(&self) -> &'a str {
        match self {
            Self::Prose(text) | Self::Code(text) => text,
        }
    }

    #[must_use]
    pub const fn is_code(&self) -> bool {
        matches!(self, Self::Code(_))
    }
}

/// Split text into prose and fenced-code segments, in order.
///
/// A fence opens at a triple backtick and closes at the next one. An unclosed
/// fence runs to the end of the text. Concatenating the segments yields the
/// input unchanged.
#[must_use]
pub fn split_segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        if open > 0 {
            segments.push(Segment::Prose(&rest[..open]));
        }
        let body_start = open + FENCE.len();
        match rest[body_start..].find(FENCE) {
            Some(close) => {
                let end = body_start + close + FENCE.len();
                segments.push(Segment::Code(&rest[open..end]));
                rest = &rest[end..];
            }
            None => {
                segments.push(Segment::Code(&rest[open..]));
                rest = "";
            }
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Prose(rest));
    }
    segments
}

/// Prose-only view of the text; code spans are replaced by a line break.
#[must_use]
pub fn strip_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in split_segments(text) {
        match segment {
            Segment::Prose(prose) => out.push_str(prose),
            Segment::Code(_) => out.push('\n'),
        }
    }
    out
}
