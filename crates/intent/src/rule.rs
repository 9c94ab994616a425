use crate::lexicon::Lexicon;
use crate::tokenize::Tokens;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const ANY_WEIGHT: i32 = 1;
const ALL_BONUS: i32 = 2;
const NONE_PENALTY: i32 = 2;
const TAG_BOOST: i32 = 1;

/// Scored keyword rule mapping input features to an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    pub name: String,
    pub intent: String,
    #[serde(default = "default_min_score", alias = "minScore")]
    pub min_score: i32,
    #[serde(default)]
    pub any: Vec<String>,
    #[serde(default)]
    pub all: Vec<String>,
    #[serde(default)]
    pub none: Vec<String>,
    #[serde(default, alias = "tagsBoost")]
    pub tags_boost: Vec<String>,
}

fn default_min_score() -> i32 {
    1
}

impl IntentRule {
    pub fn new(name: impl Into<String>, intent: impl Into<String>, min_score: i32) -> Self {
        Self {
            name: name.into(),
            intent: intent.into(),
            min_score,
            any: Vec::new(),
            all: Vec::new(),
            none: Vec::new(),
            tags_boost: Vec::new(),
        }
    }

    /// +1 per `any` hit, +2 when every `all` keyword hits, -2 per `none`
    /// hit, +1 per `tags_boost` tag already present.
    #[must_use]
    pub fn score(&self, tokens: &Tokens, lexicon: &Lexicon, tags: &BTreeSet<String>) -> i32 {
        let hits = |keywords: &[String]| {
            keywords
                .iter()
                .filter(|kw| lexicon.hits(kw, tokens))
                .count() as i32
        };

        let mut score = hits(&self.any) * ANY_WEIGHT;
        if !self.all.is_empty() && self.all.iter().all(|kw| lexicon.hits(kw, tokens)) {
            score += ALL_BONUS;
        }
        score -= hits(&self.none) * NONE_PENALTY;
        score += self
            .tags_boost
            .iter()
            .filter(|tag| tags.contains(tag.as_str()))
            .count() as i32
            * TAG_BOOST;
        score
    }
}
