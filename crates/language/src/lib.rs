//! Language detection and cross-lingual indexing.
//!
//! [`LanguageIndexer`] strips code fences, detects the language of the
//! remaining prose and derives a lowercase ASCII *index text* that downstream
//! classification and retrieval work on, whatever the source script.

mod config;
mod index_text;
mod indexer;
pub mod iso;

pub use config::{LanguageConfig, Substitution, DEFAULT_SAMPLE_CHARS};
pub use index_text::build_index_text;
pub use indexer::{LanguageIndexer, LanguageReport, DEFAULT_INDEX_LANGUAGE, MAX_ALTERNATIVES};
