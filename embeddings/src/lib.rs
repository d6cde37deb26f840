//! # Embeddings
//!
//! This crate provides embedding generation and similarity search for the
//! nldb semantic search path.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors via the Gemini API
//! - **Similarity Search**: Brute-force inner-product search over unit vectors
//! - **Persistence**: One JSON index file per entity type
//!
//! Each index record keeps its row id, source text, and vector together, so
//! a search result can never pair a vector with the wrong row.

pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::{IndexEntry, SimilarityIndex};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, GeminiProvider};
pub use similarity::{SimilarityResult, cosine_similarity, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings produced by Gemini text-embedding-004.
pub const DEFAULT_DIMENSION: usize = 768;
