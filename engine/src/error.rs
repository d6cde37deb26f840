//! Error types for the search engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the search engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] nldb_embeddings::EmbeddingError),

    /// SQL generation or guard error.
    #[error("sql generation error: {0}")]
    SqlGen(#[from] nldb_sqlgen::SqlGenError),

    /// Relational store error.
    #[error("store error: {0}")]
    Store(#[from] nldb_store::StoreError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
