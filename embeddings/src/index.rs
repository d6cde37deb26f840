//! Per-entity-type similarity index.
//!
//! A flat collection of `(id, text, vector)` records searched by brute
//! force. Keeping the row id and source text on the same record as the
//! vector means there is no positional pairing between separate lists to
//! silently corrupt.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::{SimilarityResult, find_top_k, normalize};

/// An entry in the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Row id in the relational store.
    pub id: i64,

    /// Source text the embedding was generated from.
    pub text: String,

    /// The embedding vector (unit-normalized).
    pub embedding: Embedding,
}

/// A flat similarity index for one entity type.
///
/// Vectors are normalized on insert and queries are normalized on search,
/// so inner product equals cosine similarity. Search is a linear scan;
/// acceptable only because the stored count is tiny.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityIndex {
    /// Stored entries, in insertion order.
    entries: Vec<IndexEntry>,

    /// Expected dimension of embeddings.
    dimension: usize,
}

impl SimilarityIndex {
    /// Create a new empty index.
    pub fn new(dimension: usize) -> Self {
        Self {
            entries: Vec::new(),
            dimension,
        }
    }

    /// Add an entry to the index, normalizing its vector.
    pub fn add(&mut self, id: i64, text: impl Into<String>, mut embedding: Embedding) -> Result<()> {
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        normalize(&mut embedding);
        self.entries.push(IndexEntry {
            id,
            text: text.into(),
            embedding,
        });
        debug!("Added entry {id} to index");

        Ok(())
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expected embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Iterate over stored entries.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Search for the top-k most similar entries.
    ///
    /// The query is normalized before scoring. Returns at most `len()`
    /// results, ordered by descending score.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SimilarityResult>> {
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut query = query.clone();
        normalize(&mut query);

        let candidates: Vec<(i64, String, Embedding)> = self
            .entries
            .iter()
            .map(|e| (e.id, e.text.clone(), e.embedding.clone()))
            .collect();

        find_top_k(&query, &candidates, k)
    }

    /// Persist the index as a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string(self)?;
        tokio::fs::write(path, content).await?;

        info!("Saved {} index entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Load an index from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let index: Self = serde_json::from_str(&content)?;

        info!(
            "Loaded {} index entries from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_and_len() {
        let mut index = SimilarityIndex::new(3);
        index.add(1, "item one", vec![1.0, 0.0, 0.0]).unwrap();

        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_add_normalizes() {
        let mut index = SimilarityIndex::new(2);
        index.add(1, "item", vec![3.0, 4.0]).unwrap();

        let entry = index.entries().next().unwrap();
        assert!((entry.embedding[0] - 0.6).abs() < 1e-6);
        assert!((entry.embedding[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = SimilarityIndex::new(3);
        assert!(index.add(1, "bad", vec![1.0, 0.0]).is_err());
    }

    #[test]
    fn test_search_orders_by_score() {
        let mut index = SimilarityIndex::new(3);
        index.add(1, "a", vec![1.0, 0.0, 0.0]).unwrap();
        index.add(2, "b", vec![0.0, 1.0, 0.0]).unwrap();
        index.add(3, "c", vec![0.7, 0.7, 0.0]).unwrap();

        let results = index.search(&vec![1.0, 0.0, 0.0], 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].text, "a");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_search_top_k_exceeds_len() {
        let mut index = SimilarityIndex::new(2);
        index.add(1, "a", vec![1.0, 0.0]).unwrap();
        index.add(2, "b", vec![0.0, 1.0]).unwrap();

        let results = index.search(&vec![1.0, 0.0], 50).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_result_text_matches_id() {
        // Every result must carry the text stored with its own vector.
        let mut index = SimilarityIndex::new(2);
        index.add(10, "ten", vec![1.0, 0.0]).unwrap();
        index.add(20, "twenty", vec![0.0, 1.0]).unwrap();

        let results = index.search(&vec![0.0, 1.0], 2).unwrap();
        for result in results {
            match result.id {
                10 => assert_eq!(result.text, "ten"),
                20 => assert_eq!(result.text, "twenty"),
                other => panic!("unexpected id {other}"),
            }
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.json");

        let mut index = SimilarityIndex::new(2);
        index.add(1, "John Smith", vec![1.0, 0.0]).unwrap();
        index.add(2, "Sarah Johnson", vec![0.0, 1.0]).unwrap();
        index.save(&path).await.unwrap();

        let loaded = SimilarityIndex::load(&path).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.dimension(), 2);

        let results = loaded.search(&vec![1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].text, "John Smith");
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = SimilarityIndex::load(dir.path().join("absent.json")).await;
        assert!(result.is_err());
    }
}
