//! Character classes for CJK-aware text handling.

/// East Asian script of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CjkScript {
    Han,
    Hiragana,
    Katakana,
    Hangul,
}

#[must_use]
pub fn cjk_script(c: char) -> Option<CjkScript> {
    match u32::from(c) {
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF | 0x20000..=0x2A6DF => {
            Some(CjkScript::Han)
        }
        0x3040..=0x309F => Some(CjkScript::Hiragana),
        0x30A0..=0x30FF | 0x31F0..=0x31FF => Some(CjkScript::Katakana),
        0xAC00..=0xD7AF | 0x1100..=0x11FF | 0x3130..=0x318F => Some(CjkScript::Hangul),
        _ => None,
    }
}

#[must_use]
pub fn is_han(c: char) -> bool {
    cjk_script(c) == Some(CjkScript::Han)
}

/// Ideographic and fullwidth punctuation (、。「」！？ and friends)
#[must_use]
pub fn is_cjk_punctuation(c: char) -> bool {
    matches!(u32::from(c), 0x3000..=0x303F | 0xFF01..=0xFF0F | 0xFF1A..=0xFF20 | 0xFF5B..=0xFF65)
}

/// Han, kana or CJK punctuation. Hangul is excluded: Korean separates words
/// with spaces, so its whitespace is meaningful.
#[must_use]
pub fn is_unspaced_cjk(c: char) -> bool {
    matches!(
        cjk_script(c),
        Some(CjkScript::Han | CjkScript::Hiragana | CjkScript::Katakana)
    ) || is_cjk_punctuation(c)
}
