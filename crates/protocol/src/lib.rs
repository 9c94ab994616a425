//! # Promptline Protocol
//!
//! Data model shared by every pipeline stage.
//!
//! A request owns exactly one [`ProcessingContext`]. The pipeline driver lends
//! it to one stage at a time (`&mut`), so stages never observe each other's
//! writes concurrently.

mod context;
mod knowledge;
mod language;
mod trace;

pub use context::{Intent, Outline, OutlineBucket, ProcessingContext, RenderedPrompt};
pub use knowledge::{KbCandidate, KbMatch, Metadata};
pub use language::{LanguageCandidate, LanguageDescriptor, Script};
pub use trace::{unix_ms_now, StepStatus, StepTrace};

/// Prefix of the synthetic tag recording the classified intent.
pub const INTENT_TAG_PREFIX: &str = "intent:";
