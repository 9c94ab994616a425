use crate::knowledge::KbMatch;
use crate::language::{LanguageCandidate, LanguageDescriptor};
use crate::trace::{StepStatus, StepTrace};
use crate::INTENT_TAG_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Semantic class of an outline sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutlineBucket {
    Tasks,
    Constraints,
    Context,
    Output,
}

impl OutlineBucket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "TASKS",
            Self::Constraints => "CONSTRAINTS",
            Self::Context => "CONTEXT",
            Self::Output => "OUTPUT",
        }
    }
}

/// Bucket → sentences in input order. Empty buckets are absent.
pub type Outline = BTreeMap<OutlineBucket, Vec<String>>;

/// Classified intent. Rule targets are free-form names; two sentinels are
/// reserved for the greeting fast path and the no-match case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intent(String);

impl Intent {
    pub const GREETING: &'static str = "GREETING";
    pub const UNKNOWN: &'static str = "UNKNOWN";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Self::unknown();
        }
        Self(trimmed.to_string())
    }

    #[must_use]
    pub fn greeting() -> Self {
        Self(Self::GREETING.to_string())
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    #[must_use]
    pub fn is_greeting(&self) -> bool {
        self.0 == Self::GREETING
    }

    /// `intent:<lowercased name>`
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{INTENT_TAG_PREFIX}{}", self.0.to_lowercase())
    }
}

impl Default for Intent {
    fn default() -> Self {
        Self::unknown()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// System and user halves of the prompt sent to the generation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

impl RenderedPrompt {
    #[must_use]
    pub fn final_text(&self) -> String {
        if self.system.is_empty() {
            return self.user.clone();
        }
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Per-request state threaded through the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingContext {
    pub raw_input: String,
    /// Tenant (user/session) the request belongs to; scopes cache keys
    pub scope: Option<String>,

    pub normalized_text: String,
    pub outline: Outline,
    pub change_ratio: f64,
    pub has_code: bool,

    pub language: LanguageDescriptor,
    pub language_alternatives: Vec<LanguageCandidate>,
    pub index_language: String,
    pub index_text: String,

    pub intent: Intent,
    pub tags: BTreeSet<String>,

    pub cache_key: Option<String>,
    pub cache_hit: bool,
    pub cache_frequency: u64,

    pub kb_matches: Vec<KbMatch>,
    pub prompt: Option<RenderedPrompt>,
    pub answer: Option<String>,

    pub trace: Vec<StepTrace>,
}

impl ProcessingContext {
    #[must_use]
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self {
            raw_input: raw_input.into(),
            index_language: "en".to_string(),
            ..Default::default()
        }
    }

    /// Builder: scope the request to a user or session
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.scope = (!scope.trim().is_empty()).then_some(scope);
        self
    }

    /// Text the classifier and retriever read: index text, else normalized.
    #[must_use]
    pub fn query_text(&self) -> &str {
        if self.index_text.trim().is_empty() {
            &self.normalized_text
        } else {
            &self.index_text
        }
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Replace any previous `intent:*` tag with the one for `intent`.
    pub fn set_intent(&mut self, intent: Intent) {
        self.tags.retain(|tag| !tag.starts_with(INTENT_TAG_PREFIX));
        self.tags.insert(intent.tag());
        self.intent = intent;
    }

    pub fn record(&mut self, stage: &str, status: StepStatus, note: impl Into<String>) {
        self.trace.push(StepTrace::new(stage, status, note));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_intent_keeps_single_intent_tag() {
        let mut ctx = ProcessingContext::new("hello");
        ctx.add_tag("lang:en");
        ctx.set_intent(Intent::greeting());
        ctx.set_intent(Intent::new("code_help"));

        let intent_tags: Vec<_> = ctx
            .tags
            .iter()
            .filter(|t| t.starts_with(INTENT_TAG_PREFIX))
            .cloned()
            .collect();
        assert_eq!(intent_tags, vec!["intent:code_help".to_string()]);
        assert!(ctx.has_tag("lang:en"));
    }

    #[test]
    fn blank_intent_name_is_unknown() {
        assert!(Intent::new("  ").is_unknown());
        assert_eq!(Intent::default().tag(), "intent:unknown");
    }

    #[test]
    fn blank_scope_is_dropped() {
        let ctx = ProcessingContext::new("x").with_scope("  ");
        assert_eq!(ctx.scope, None);
        let ctx = ProcessingContext::new("x").with_scope("user-7");
        assert_eq!(ctx.scope.as_deref(), Some("user-7"));
    }

    #[test]
    fn query_text_falls_back_to_normalized() {
        let mut ctx = ProcessingContext::new("raw");
        ctx.normalized_text = "Normalized".to_string();
        assert_eq!(ctx.query_text(), "Normalized");
        ctx.index_text = "normalized".to_string();
        assert_eq!(ctx.query_text(), "normalized");
    }

    #[test]
    fn final_text_joins_system_and_user() {
        let prompt = RenderedPrompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        assert_eq!(prompt.final_text(), "sys\n\nusr");
    }
}
