//! Knowledge retrieval by embedding similarity.
//!
//! [`rank`] is the pure core: cosine similarity over the common prefix of
//! the two vectors, stable descending sort, top K. [`KnowledgeRetriever`]
//! wires it to the [`Embedder`] and [`DocumentStore`] collaborators.

mod config;
mod embedder;
mod error;
mod rank;
mod retriever;
mod store;

pub use config::RetrievalConfig;
pub use embedder::{Embedder, StubEmbedder};
pub use error::{Result, RetrievalError};
pub use rank::{clamp_k, cosine_similarity, rank, DEFAULT_K, MAX_K};
pub use retriever::KnowledgeRetriever;
pub use store::{DocumentFilter, DocumentPage, DocumentStore, InMemoryDocumentStore};
