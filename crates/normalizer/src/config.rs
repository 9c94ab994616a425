use serde::{Deserialize, Serialize};

/// Lower bound applied to any configured character limit
pub const MIN_CHAR_LIMIT: usize = 2000;
/// Upper bound applied to any configured character limit
pub const MAX_CHAR_LIMIT: usize = 8000;

/// Configuration for text normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Maximum length of the normalized text in chars (clamped to
    /// `MIN_CHAR_LIMIT..=MAX_CHAR_LIMIT`)
    pub char_limit: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { char_limit: 4000 }
    }
}

impl NormalizerConfig {
    /// Limit actually enforced
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.char_limit.clamp(MIN_CHAR_LIMIT, MAX_CHAR_LIMIT)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.char_limit == 0 {
            return Err("normalizer.char_limit must be > 0".to_string());
        }
        Ok(())
    }
}
