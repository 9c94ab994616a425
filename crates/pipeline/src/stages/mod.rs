//! Built-in stages, in pipeline order:
//! normalize → language → intent → cache_lookup → canned_response →
//! retrieval → assemble → generate → cache_store.

mod answer;
mod cache;
mod text;

pub use answer::{AssembleStage, CannedResponseStage, GenerateStage, RetrievalStage};
pub use cache::{CacheLookupStage, CacheStoreStage};
pub use text::{IntentStage, LanguageStage, NormalizeStage, HAS_CODE_TAG};
