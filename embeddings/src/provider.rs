//! Embedding providers.
//!
//! Wraps the Gemini text-embedding API: text in, fixed-length float vector
//! out. There is deliberately no retry or backoff here; failures surface to
//! the caller as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Request for generating an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Text to embed.
    pub text: String,

    /// Model to use (provider-specific).
    pub model: Option<String>,
}

impl EmbeddingRequest {
    /// Create a new embedding request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Response from embedding generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The generated embedding.
    pub embedding: Embedding,

    /// Model used to generate the embedding.
    pub model: String,

    /// Dimension of the embedding.
    pub dimension: usize,
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the default model for this provider.
    fn default_model(&self) -> &str;

    /// Get the default embedding dimension.
    fn default_dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, requests: Vec<EmbeddingRequest>) -> Result<Vec<EmbeddingResponse>> {
        // Default implementation: process sequentially
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.embed(request).await?);
        }
        Ok(results)
    }

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// Gemini embedding provider.
pub struct GeminiProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Default model.
    default_model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the key from `GOOGLE_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_API_KEY").ok(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
            default_model: "text-embedding-004".to_string(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(EmbeddingError::ProviderNotConfigured)
    }
}

/// Map an HTTP 429 to the rate-limit error, honoring `retry-after`.
fn check_rate_limit(response: &reqwest::Response) -> Result<()> {
    if response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Ok(());
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);

    Err(EmbeddingError::RateLimited {
        retry_after_secs: retry_after,
    })
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn default_dimension(&self) -> usize {
        match self.default_model.as_str() {
            "text-embedding-004" => 768,
            "gemini-embedding-001" => 3072,
            _ => 768,
        }
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let api_key = self.api_key()?;
        let model = request.model.unwrap_or_else(|| self.default_model.clone());

        debug!("Generating embedding with model: {model}");

        let body = serde_json::json!({
            "content": { "parts": [{ "text": request.text }] }
        });

        let response = self
            .client
            .post(format!("{}/models/{model}:embedContent", self.base_url))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        check_rate_limit(&response)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: GeminiEmbedResponse = response.json().await?;
        let embedding = result.embedding.values;

        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "no embedding in response".to_string(),
            ));
        }

        let dimension = embedding.len();
        debug!("Generated embedding with {dimension} dimensions");

        Ok(EmbeddingResponse {
            embedding,
            model,
            dimension,
        })
    }

    async fn embed_batch(&self, requests: Vec<EmbeddingRequest>) -> Result<Vec<EmbeddingResponse>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let api_key = self.api_key()?;
        let model = requests[0]
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        debug!(
            "Generating batch embeddings for {} texts with model: {model}",
            requests.len()
        );

        let batch: Vec<serde_json::Value> = requests
            .iter()
            .map(|r| {
                serde_json::json!({
                    "model": format!("models/{model}"),
                    "content": { "parts": [{ "text": r.text }] }
                })
            })
            .collect();

        let response = self
            .client
            .post(format!(
                "{}/models/{model}:batchEmbedContents",
                self.base_url
            ))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "requests": batch }))
            .send()
            .await?;

        check_rate_limit(&response)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: GeminiBatchEmbedResponse = response.json().await?;

        if result.embeddings.len() != requests.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                requests.len(),
                result.embeddings.len()
            )));
        }

        let responses: Vec<EmbeddingResponse> = result
            .embeddings
            .into_iter()
            .map(|item| {
                let dimension = item.values.len();
                EmbeddingResponse {
                    embedding: item.values,
                    model: model.clone(),
                    dimension,
                }
            })
            .collect();

        info!("Generated {} batch embeddings", responses.len());

        Ok(responses)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GeminiEmbedResponse {
    embedding: GeminiEmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct GeminiBatchEmbedResponse {
    embeddings: Vec<GeminiEmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct GeminiEmbeddingValues {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_embedding_request() {
        let request = EmbeddingRequest::new("Hello world").with_model("text-embedding-004");

        assert_eq!(request.text, "Hello world");
        assert_eq!(request.model, Some("text-embedding-004".to_string()));
    }

    #[test]
    fn test_default_dimension() {
        let provider = GeminiProvider::new().with_model("text-embedding-004");
        assert_eq!(provider.default_dimension(), 768);
    }

    #[test]
    fn test_unavailable_without_key() {
        let provider = GeminiProvider {
            api_key: None,
            base_url: "http://localhost".to_string(),
            client: reqwest::Client::new(),
            default_model: "text-embedding-004".to_string(),
        };
        assert!(!provider.is_available());
    }

    #[tokio::test]
    async fn test_embed_via_mock_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:embedContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": { "values": [0.1, 0.2, 0.3] }
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let response = provider
            .embed(EmbeddingRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(response.dimension, 3);
        assert_eq!(response.embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_batch_via_mock_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:batchEmbedContents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [
                    { "values": [1.0, 0.0] },
                    { "values": [0.0, 1.0] }
                ]
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let responses = provider
            .embed_batch(vec![
                EmbeddingRequest::new("first"),
                EmbeddingRequest::new("second"),
            ])
            .await
            .unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1].embedding, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let err = provider
            .embed(EmbeddingRequest::new("hello"))
            .await
            .unwrap_err();

        match err {
            EmbeddingError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, 7);
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_on_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:batchEmbedContents"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri());

        let err = provider
            .embed_batch(vec![
                EmbeddingRequest::new("first"),
                EmbeddingRequest::new("second"),
            ])
            .await
            .unwrap_err();

        match err {
            EmbeddingError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, 12);
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
    }
}
