//! # Search Engine
//!
//! This crate ties the nldb pieces together:
//!
//! - **SQL path**: question → generated SQL → read-only guard → execution
//! - **Semantic path**: question → embedding → per-entity index → top-k ids
//!   → full-row lookup
//!
//! The two paths are independent: a failure on the semantic path never
//! affects the SQL results. The semantic path swallows every failure and
//! reports no matches instead.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nldb_engine::{EngineConfig, SearchEngine};
//!
//! let engine = SearchEngine::new(EngineConfig::default());
//! let outcome = engine.ask("Show all employees in Sales").await?;
//! println!("{}", outcome.sql);
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use engine::{SearchEngine, SearchOutcome, SimilarItems};
pub use error::{EngineError, Result};

// Re-export from dependencies for convenience
pub use nldb_embeddings::{EmbeddingProvider, SimilarityIndex, SimilarityResult};
pub use nldb_sqlgen::SqlGenerator;
pub use nldb_store::{EntityKind, QueryRows, SeedBatch};
