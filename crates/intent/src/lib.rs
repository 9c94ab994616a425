//! Rule-based intent classification.
//!
//! Text is tokenized (Latin words and bigrams, CJK runs with character
//! unigrams and bigrams), greetings short-circuit, and otherwise every rule
//! of the loaded [`IntentResources`] is scored in order. The best rule whose
//! score reaches its own minimum wins; earlier rules win ties.

mod classifier;
mod error;
mod greeting;
mod lexicon;
mod resources;
mod rule;
mod tokenize;

pub use classifier::{Classification, IntentClassifier, RULE_TAG_PREFIX};
pub use error::{IntentResourceError, Result};
pub use greeting::{clean_greeting_text, is_greeting};
pub use lexicon::{Lexicon, LexiconEntry, RawLexiconEntry};
pub use resources::{IntentResources, RESOURCE_VERSION, RULES_ENV};
pub use rule::IntentRule;
pub use tokenize::{tokenize, Tokens};
