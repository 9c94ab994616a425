use crate::greeting::is_greeting;
use crate::lexicon::Lexicon;
use crate::resources::IntentResources;
use crate::rule::IntentRule;
use crate::tokenize::tokenize;
use promptline_protocol::{Intent, ProcessingContext};
use serde::Serialize;
use std::collections::BTreeSet;

/// Tag prefix recording which rule produced the intent
pub const RULE_TAG_PREFIX: &str = "rule:";

/// Outcome of one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    /// Winning rule, `None` for greetings and unknown intents
    pub rule: Option<String>,
    pub score: i32,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            intent: Intent::unknown(),
            rule: None,
            score: 0,
        }
    }
}

/// Greeting fast path plus ordered rule scoring
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    lexicon: Lexicon,
}

impl IntentClassifier {
    #[must_use]
    pub fn new(resources: IntentResources) -> Self {
        Self {
            rules: resources.rules,
            lexicon: resources.lexicon,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify `text` given the tags already on the request.
    #[must_use]
    pub fn classify(&self, text: &str, tags: &BTreeSet<String>) -> Classification {
        if is_greeting(text) {
            return Classification {
                intent: Intent::greeting(),
                rule: None,
                score: 0,
            };
        }
        self.evaluate_rules(text, tags)
    }

    fn evaluate_rules(&self, text: &str, tags: &BTreeSet<String>) -> Classification {
        let tokens = tokenize(text);
        let mut best: Option<(&IntentRule, i32)> = None;

        for rule in &self.rules {
            let score = rule.score(&tokens, &self.lexicon, tags);
            log::trace!("Rule {} scored {}", rule.name, score);
            if score < rule.min_score {
                continue;
            }
            // Strict comparison: on a tie the earlier rule stays.
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((rule, score));
            }
        }

        match best {
            Some((rule, score)) => Classification {
                intent: Intent::new(&rule.intent),
                rule: Some(rule.name.clone()),
                score,
            },
            None => Classification::unknown(),
        }
    }

    /// Classify the context's index text (normalized text when empty) and
    /// record the intent and its tags.
    pub fn classify_context(&self, ctx: &mut ProcessingContext) -> Classification {
        let text = if ctx.index_text.trim().is_empty() {
            ctx.normalized_text.as_str()
        } else {
            ctx.index_text.as_str()
        };

        let classification = if is_greeting(text) || is_greeting(&ctx.normalized_text) {
            Classification {
                intent: Intent::greeting(),
                rule: None,
                score: 0,
            }
        } else {
            self.evaluate_rules(text, &ctx.tags)
        };

        log::debug!(
            "Classified as {} (rule: {}, score: {})",
            classification.intent,
            classification.rule.as_deref().unwrap_or("-"),
            classification.score
        );

        ctx.tags.retain(|tag| !tag.starts_with(RULE_TAG_PREFIX));
        if let Some(rule) = &classification.rule {
            ctx.add_tag(format!("{RULE_TAG_PREFIX}{rule}"));
        }
        ctx.set_intent(classification.intent.clone());
        classification
    }
}
