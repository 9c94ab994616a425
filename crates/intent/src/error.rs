use std::path::PathBuf;
use thiserror::Error;

/// Result type for rule resource loading
pub type Result<T> = std::result::Result<T, IntentResourceError>;

/// Errors raised while loading intent rules and lexicon
#[derive(Error, Debug)]
pub enum IntentResourceError {
    /// Resource file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resource is not valid JSON for the expected shape
    #[error("Malformed intent resource: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported intent resource version {0} (expected {expected})", expected = crate::resources::RESOURCE_VERSION)]
    UnsupportedVersion(u32),

    /// Structurally valid but unusable content
    #[error("Invalid intent resource: {0}")]
    Invalid(String),
}
