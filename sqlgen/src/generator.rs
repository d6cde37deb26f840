//! NL-to-SQL generation via the Gemini API.
//!
//! Fills a fixed prompt template with the hardcoded schema description and
//! the user's question, makes one generation call, and strips any markdown
//! code fencing from the reply. No retry on malformed output; the only
//! validation is the keyword guard applied by callers.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, SqlGenError};

/// Schema description handed to the LLM with every question.
pub const SCHEMA_DESCRIPTION: &str = "\
TABLES:
- departments (id, name)
- employees (id, name, department_id, email, salary)
- products (id, name, price)
- orders (id, customer_name, employee_id, order_total, order_date)

RELATIONSHIPS:
- employees.department_id -> departments.id
- orders.employee_id -> employees.id";

/// Remove markdown code-fence wrapping from LLM output.
///
/// Handles ```sql fences, bare ``` fences, and unfenced text.
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Trait for SQL generators.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    /// Generate a SQL statement for the given question.
    async fn generate_sql(&self, question: &str) -> Result<String>;

    /// Check if the generator is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// Gemini-backed SQL generator.
pub struct GeminiSqlGenerator {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model to use.
    model: String,

    /// Sampling temperature. Low by default so the SQL stays predictable.
    temperature: f32,
}

impl GeminiSqlGenerator {
    /// Create a new generator with the key from `GOOGLE_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_API_KEY").ok(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.1,
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

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(question: &str) -> String {
        format!(
            "You are a SQL expert. Convert this question to SQLite SQL.\n\
             \n\
             DATABASE:\n\
             {SCHEMA_DESCRIPTION}\n\
             \n\
             RULES:\n\
             - Generate ONLY the SQL query\n\
             - Use JOINs when needed\n\
             - Only SELECT statements (no INSERT/UPDATE/DELETE)\n\
             - Add LIMIT 50 to avoid huge results\n\
             \n\
             QUESTION: {question}\n\
             \n\
             SQL:"
        )
    }
}

impl Default for GeminiSqlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SqlGenerator for GeminiSqlGenerator {
    async fn generate_sql(&self, question: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(SqlGenError::NotConfigured)?;

        debug!("Generating SQL with model: {}", self.model);

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": Self::build_prompt(question) }] }],
            "generationConfig": { "temperature": self.temperature }
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SqlGenError::ApiRequest(format!("API error: {error_text}")));
        }

        let result: GenerateContentResponse = response.json().await?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| SqlGenError::InvalidResponse("no candidates in response".to_string()))?;

        let sql = strip_code_fences(&text);
        info!("Generated SQL: {sql}");

        Ok(sql)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}
