//! Configuration for the search engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,

    /// Directory holding one similarity index file per entity type.
    pub index_dir: PathBuf,

    /// Number of similar items to return.
    pub top_k: usize,
}

impl EngineConfig {
    /// Create a configuration rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            db_path: data_dir.join("nldb.db"),
            index_dir: data_dir.join("indexes"),
            top_k: 5,
        }
    }

    /// Set the database path.
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Set the index directory.
    pub fn with_index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = dir.into();
        self
    }

    /// Set the number of similar items to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

/// Data directory from `NLDB_DATA_DIR`, falling back to `~/.nldb`.
pub fn default_data_dir() -> PathBuf {
    std::env::var("NLDB_DATA_DIR").map_or_else(
        |_| dirs::home_dir().unwrap_or_default().join(".nldb"),
        PathBuf::from,
    )
}
