use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Blank query text or empty query embedding
    #[error("Empty query")]
    EmptyQuery,

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Document store error: {0}")]
    Store(String),
}
