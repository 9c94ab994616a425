use sha2::{Digest, Sha256};

/// Derive an opaque cache key from language and normalized text, scoped by
/// tenant when `scope` is given. Blank text yields no key.
#[must_use]
pub fn derive_key(scope: Option<&str>, language: &str, normalized: &str) -> Option<String> {
    let text = normalized.trim();
    if text.is_empty() {
        return None;
    }

    let mut hasher = Sha256::new();
    if let Some(scope) = scope.map(str::trim).filter(|s| !s.is_empty()) {
        hasher.update(b"scope\0");
        hasher.update(scope.as_bytes());
        hasher.update(b"\0");
    }
    hasher.update(language.trim().to_lowercase().as_bytes());
    hasher.update(b"\0");
    hasher.update(text.as_bytes());
    Some(format!("{:x}", hasher.finalize()))
}
