use serde::{Deserialize, Serialize};

/// Writing system of the detected language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Latin,
    Cyrillic,
    Arabic,
    Hebrew,
    Devanagari,
    Thai,
    Hangul,
    Han,
    Mixed,
    #[default]
    Unknown,
}

impl Script {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latin => "latin",
            Self::Cyrillic => "cyrillic",
            Self::Arabic => "arabic",
            Self::Hebrew => "hebrew",
            Self::Devanagari => "devanagari",
            Self::Thai => "thai",
            Self::Hangul => "hangul",
            Self::Han => "han",
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language assigned to a request. Always present: detection failures map to
/// the undetermined sentinel instead of leaving the field empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    /// ISO 639-1 when one exists, ISO 639-3 otherwise, `und` when unknown
    pub iso_code: String,
    pub display_name: String,
    pub confidence: f64,
    pub script: Script,
}

impl LanguageDescriptor {
    pub const UNDETERMINED_CODE: &'static str = "und";
    pub const UNDETERMINED_NAME: &'static str = "Undetermined";

    #[must_use]
    pub fn new(
        iso_code: impl Into<String>,
        display_name: impl Into<String>,
        confidence: f64,
        script: Script,
    ) -> Self {
        Self {
            iso_code: iso_code.into(),
            display_name: display_name.into(),
            confidence,
            script,
        }
    }

    #[must_use]
    pub fn undetermined(script: Script) -> Self {
        Self::new(Self::UNDETERMINED_CODE, Self::UNDETERMINED_NAME, 0.0, script)
    }

    #[must_use]
    pub fn is_undetermined(&self) -> bool {
        self.iso_code == Self::UNDETERMINED_CODE
    }
}

impl Default for LanguageDescriptor {
    fn default() -> Self {
        Self::undetermined(Script::Unknown)
    }
}

/// One entry of the ranked detection alternatives kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCandidate {
    pub iso_code: String,
    pub display_name: String,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_undetermined() {
        let lang = LanguageDescriptor::default();
        assert!(lang.is_undetermined());
        assert_eq!(lang.display_name, "Undetermined");
        assert_eq!(lang.script, Script::Unknown);
    }

    #[test]
    fn script_serializes_snake_case() {
        let raw = serde_json::to_string(&Script::Devanagari).unwrap();
        assert_eq!(raw, "\"devanagari\"");
        assert_eq!(Script::Mixed.to_string(), "mixed");
    }
}
