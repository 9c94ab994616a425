use crate::error::{IntentResourceError, Result};
use crate::lexicon::{Lexicon, RawLexiconEntry};
use crate::rule::IntentRule;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an override resource file
pub const RULES_ENV: &str = "PROMPTLINE_INTENT_RULES";

/// Supported resource schema version
pub const RESOURCE_VERSION: u32 = 1;

const BUILTIN_RULES: &str = include_str!("../resources/default_rules.json");

#[derive(Debug, Deserialize)]
struct RawResource {
    version: u32,
    #[serde(default)]
    rules: Vec<IntentRule>,
    #[serde(default)]
    lexicon: HashMap<String, RawLexiconEntry>,
}

/// Rules and lexicon loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct IntentResources {
    pub rules: Vec<IntentRule>,
    pub lexicon: Lexicon,
}

impl IntentResources {
    /// Parse a JSON resource document.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawResource = serde_json::from_str(json)?;
        if raw.version != RESOURCE_VERSION {
            return Err(IntentResourceError::UnsupportedVersion(raw.version));
        }
        for (idx, rule) in raw.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(IntentResourceError::Invalid(format!("rule #{idx} has no name")));
            }
            if rule.intent.trim().is_empty() {
                return Err(IntentResourceError::Invalid(format!(
                    "rule '{}' has no intent",
                    rule.name
                )));
            }
        }
        Ok(Self {
            rules: raw.rules,
            lexicon: Lexicon::from_raw(raw.lexicon),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| IntentResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json)
    }

    /// Resources compiled into the crate
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_RULES)
    }

    /// Load from `explicit`, else from `$PROMPTLINE_INTENT_RULES`, else the
    /// builtin document. Failures degrade to empty resources with a warning.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        let override_path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(RULES_ENV).map(PathBuf::from));

        let loaded = match &override_path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        };
        match loaded {
            Ok(resources) => {
                log::info!(
                    "Loaded {} intent rules and {} lexicon entries from {}",
                    resources.rules.len(),
                    resources.lexicon.len(),
                    override_path
                        .as_deref()
                        .map_or_else(|| "builtin resource".to_string(), |p| p.display().to_string())
                );
                resources
            }
            Err(e) => {
                log::warn!("Intent resources unavailable, only greetings will be detected: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_resource_parses() {
        let resources = IntentResources::builtin().expect("builtin rules");
        assert!(!resources.rules.is_empty());
        assert!(!resources.lexicon.is_empty());
    }

    #[test]
    fn rejects_unknown_version() {
        let err = IntentResources::parse(r#"{"version": 7}"#).unwrap_err();
        assert!(matches!(err, IntentResourceError::UnsupportedVersion(7)));
    }

    #[test]
    fn rejects_nameless_rules() {
        let err = IntentResources::parse(r#"{"version":1,"rules":[{"name":" ","intent":"X"}]}"#)
            .unwrap_err();
        assert!(matches!(err, IntentResourceError::Invalid(_)));
    }

    #[test]
    fn loads_explicit_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version":1,"rules":[{{"name":"r","intent":"ONLY","any":["x"]}}],"lexicon":{{}}}}"#
        )
        .unwrap();
        let resources = IntentResources::load(Some(file.path()));
        assert_eq!(resources.rules.len(), 1);
        assert_eq!(resources.rules[0].min_score, 1);
    }

    #[test]
    fn malformed_or_missing_override_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let resources = IntentResources::load(Some(file.path()));
        assert!(resources.rules.is_empty());
        assert!(resources.lexicon.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let resources = IntentResources::load(Some(&dir.path().join("missing.json")));
        assert!(resources.rules.is_empty());
    }
}
