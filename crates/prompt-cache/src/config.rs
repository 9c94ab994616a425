use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Optional bounds for the prompt cache. Both are off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Evict the least recently seen entry beyond this many entries
    pub max_entries: Option<usize>,

    /// Entries not seen for this long vanish on lookup
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == Some(0) {
            return Err("max_entries must be greater than 0 when set".to_string());
        }
        if self.ttl_secs == Some(0) {
            return Err("ttl_secs must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}
