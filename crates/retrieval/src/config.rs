use crate::rank::{DEFAULT_K, MAX_K};
use serde::{Deserialize, Serialize};

/// Configuration for knowledge retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Matches per request; clamped to `1..=20`, non-positive means 5
    pub top_k: i64,

    /// Doc types offered as candidates (empty = all)
    pub doc_types: Vec<String>,

    /// Store listing page size
    pub page_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_K as i64,
            doc_types: Vec::new(),
            page_size: 256,
        }
    }
}

impl RetrievalConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("page_size must be greater than 0".to_string());
        }
        if self.top_k > MAX_K as i64 {
            log::warn!("top_k {} exceeds {}, it will be clamped", self.top_k, MAX_K);
        }
        if self.doc_types.iter().any(|t| t.trim().is_empty()) {
            return Err("doc_types must not contain blank entries".to_string());
        }
        Ok(())
    }
}
