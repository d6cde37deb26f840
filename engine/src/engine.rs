//! Search engine implementation.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use nldb_embeddings::provider::EmbeddingRequest;
use nldb_embeddings::{EmbeddingProvider, GeminiProvider, SimilarityIndex, SimilarityResult};
use nldb_sqlgen::{GeminiSqlGenerator, SqlGenerator, check_sql};
use nldb_store::{
    EntityKind, QueryRows, SeedBatch, connect, fetch_by_ids, init_schema, run_query,
    seed_sample_data,
};

use crate::config::EngineConfig;
use crate::error::Result;

/// The outcome of one question: the SQL path plus the semantic path.
#[derive(Debug)]
pub struct SearchOutcome {
    /// SQL generated for the question.
    pub sql: String,

    /// Rows returned by executing the SQL.
    pub rows: QueryRows,

    /// Semantically similar items, if the semantic path produced any.
    pub similar: Option<SimilarItems>,
}

/// Similar items found by the semantic path.
#[derive(Debug)]
pub struct SimilarItems {
    /// Entity type the question was routed to.
    pub kind: EntityKind,

    /// Top-k matches from the index, descending by score.
    pub matches: Vec<SimilarityResult>,

    /// Full rows for the matched ids.
    pub records: QueryRows,
}

/// Search engine combining LLM-generated SQL with similarity lookup.
pub struct SearchEngine {
    /// Configuration.
    config: EngineConfig,

    /// Embedding provider for the semantic path.
    provider: Box<dyn EmbeddingProvider>,

    /// SQL generator for the exact path.
    generator: Box<dyn SqlGenerator>,
}

impl SearchEngine {
    /// Create an engine with the default Gemini-backed provider and
    /// generator.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            provider: Box::new(GeminiProvider::new()),
            generator: Box::new(GeminiSqlGenerator::new()),
        }
    }

    /// Replace the embedding provider.
    pub fn with_provider(mut self, provider: Box<dyn EmbeddingProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Replace the SQL generator.
    pub fn with_generator(mut self, generator: Box<dyn SqlGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create the database schema.
    pub async fn init_database(&self) -> Result<()> {
        if let Some(parent) = self.config.db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut conn = connect(&self.config.db_path).await?;
        init_schema(&mut conn).await?;

        info!("Database initialized at {}", self.config.db_path.display());
        Ok(())
    }

    /// Insert the sample data set and build all similarity indexes.
    ///
    /// Rows and vectors are created together here; there is no update path
    /// afterwards, so if rows change later the indexes go stale.
    pub async fn seed(&self) -> Result<Vec<SeedBatch>> {
        self.init_database().await?;

        let mut conn = connect(&self.config.db_path).await?;
        let batches = seed_sample_data(&mut conn).await?;
        drop(conn);

        self.build_indexes(&batches).await?;
        Ok(batches)
    }

    /// Embed each batch's texts and persist one index file per entity type.
    pub async fn build_indexes(&self, batches: &[SeedBatch]) -> Result<()> {
        for batch in batches {
            if batch.rows.is_empty() {
                continue;
            }

            debug!(
                "Building index for {} ({} rows)",
                batch.kind,
                batch.rows.len()
            );

            let requests: Vec<EmbeddingRequest> = batch
                .rows
                .iter()
                .map(|(_, text)| EmbeddingRequest::new(text.clone()))
                .collect();
            let responses = self.provider.embed_batch(requests).await?;

            let dimension = responses
                .first()
                .map(|r| r.dimension)
                .unwrap_or_else(|| self.provider.default_dimension());

            let mut index = SimilarityIndex::new(dimension);
            for ((id, text), response) in batch.rows.iter().zip(responses) {
                index.add(*id, text.clone(), response.embedding)?;
            }

            index.save(self.index_file(batch.kind)).await?;
            info!("Built {} index with {} entries", batch.kind, index.len());
        }

        Ok(())
    }

    /// Answer a question: generate SQL, guard it, run it, and independently
    /// look up similar items.
    pub async fn ask(&self, question: &str) -> Result<SearchOutcome> {
        debug!("Processing question: {question}");

        let sql = self.generator.generate_sql(question).await?;
        check_sql(&sql).map_err(nldb_sqlgen::SqlGenError::from)?;

        let mut conn = connect(&self.config.db_path).await?;
        let rows = run_query(&mut conn, &sql).await?;
        drop(conn);

        let similar = self.find_similar(question).await;

        Ok(SearchOutcome { sql, rows, similar })
    }

    /// Find items semantically similar to the question.
    ///
    /// Every failure on this path (no entity keyword in the question,
    /// missing or corrupt index file, provider error) is swallowed and
    /// reported as "no matches".
    pub async fn find_similar(&self, question: &str) -> Option<SimilarItems> {
        match self.try_find_similar(question).await {
            Ok(similar) => similar,
            Err(err) => {
                warn!("Similarity search failed, returning no matches: {err}");
                None
            }
        }
    }

    async fn try_find_similar(&self, question: &str) -> Result<Option<SimilarItems>> {
        let Some(kind) = EntityKind::detect(question) else {
            debug!("No entity keyword in question, skipping similarity search");
            return Ok(None);
        };

        let index = SimilarityIndex::load(self.index_file(kind)).await?;

        let response = self
            .provider
            .embed(EmbeddingRequest::new(question.to_string()))
            .await?;
        let matches = index.search(&response.embedding, self.config.top_k)?;

        if matches.is_empty() {
            return Ok(None);
        }

        let ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
        let mut conn = connect(&self.config.db_path).await?;
        let records = fetch_by_ids(&mut conn, kind, &ids).await?;

        debug!("Found {} similar {} items", matches.len(), kind);

        Ok(Some(SimilarItems {
            kind,
            matches,
            records,
        }))
    }

    fn index_file(&self, kind: EntityKind) -> PathBuf {
        self.config.index_dir.join(format!("{kind}.json"))
    }
}
