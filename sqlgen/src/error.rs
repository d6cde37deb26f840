//! Error types for SQL generation.

use thiserror::Error;

use crate::guard::GuardError;

/// Result type alias for SQL generation operations.
pub type Result<T> = std::result::Result<T, SqlGenError>;

/// Errors that can occur while generating or validating SQL.
#[derive(Error, Debug)]
pub enum SqlGenError {
    /// Generator not configured.
    #[error("SQL generator not configured")]
    NotConfigured,

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// Invalid response from the LLM.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The generated statement was rejected by the guard.
    #[error("unsafe SQL rejected: {0}")]
    Rejected(#[from] GuardError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
