//! # Promptline Normalizer
//!
//! Turns a raw user message into clean prose while keeping code verbatim.
//!
//! ## Pipeline
//!
//! ```text
//! raw text
//!     │
//!     ├──> Segmentation (``` fences → code, rest → prose)
//!     │
//!     ├──> Prose cleanup (per prose span)
//!     │    ├─> NFC, zero-width/control stripping
//!     │    ├─> quote/dash folding, repeated punctuation collapse
//!     │    ├─> sentence-initial "i" → "I"
//!     │    └─> CJK spacing repair
//!     │
//!     ├──> Cross-segment tidy (dedupe lines, repeated words, blank lines)
//!     │
//!     ├──> Short-text merge + outline extraction
//!     │
//!     └──> Length ceiling (clamped to 2000..=8000 chars)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use promptline_normalizer::{Normalizer, NormalizerConfig};
//!
//! let normalizer = Normalizer::new(NormalizerConfig::default());
//! let out = normalizer.normalize("i like teh apples!! see https://a.b");
//! assert!(out.text.starts_with("I "));
//! assert!(out.text.contains("apples!"));
//! assert!(out.text.contains("https://a.b"));
//! ```

pub mod cjk;
mod config;
mod normalizer;
mod outline;
mod prose;
mod segment;

pub use config::{NormalizerConfig, MAX_CHAR_LIMIT, MIN_CHAR_LIMIT};
pub use normalizer::{Normalized, Normalizer, TRUNCATION_MARKER};
pub use outline::{build_outline, classify_sentence, split_sentences};
pub use segment::{split_segments, strip_code, Segment, FENCE};
