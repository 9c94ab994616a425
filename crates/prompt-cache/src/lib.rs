//! Shared prompt cache.
//!
//! One [`PromptCache`] is created per process and handed to every request's
//! pipeline behind an `Arc`. Keys are opaque to the cache; [`derive_key`]
//! is the usual way to build them.

mod backend;
mod cache;
mod config;
mod key;

pub use backend::CacheBackend;
pub use cache::{CacheEntry, CacheStats, PromptCache};
pub use config::CacheConfig;
pub use key::derive_key;
