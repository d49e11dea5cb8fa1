//! Ollama embedding provider and text generator.
//!
//! Both talk to an Ollama server over its HTTP API with `reqwest`:
//!
//! - [`OllamaEmbeddingProvider`] calls `POST /api/embed`
//! - [`OllamaGenerator`] calls `POST /api/generate` with streaming disabled
//! - [`OllamaClient::list_models`] calls `GET /api/tags`
//!
//! This module is only available when the `ollama` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::TextGenerator;

/// The default Ollama base URL inside the compose network.
pub const DEFAULT_BASE_URL: &str = "http://ollama:11434";

/// The default embedding model (all-MiniLM-L6-v2).
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// The dimensionality of `all-minilm` embeddings.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// The default generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "deepseek-r1:1.5b";

const PROVIDER: &str = "Ollama";

/// A thin HTTP client for one Ollama server.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the given base URL (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// The server base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Names of the models installed on the server.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::GenerationError`] if the server is unreachable or
    /// answers with a non-success status.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url("/api/tags"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| generation_error(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(generation_error(format!("status code {status}")));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| generation_error(format!("failed to parse response: {e}")))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether `model` is installed on the server.
    pub async fn has_model(&self, model: &str) -> Result<bool> {
        Ok(self.list_models().await?.iter().any(|name| name == model))
    }
}

fn generation_error(message: String) -> RagError {
    RagError::GenerationError { provider: PROVIDER.into(), message }
}

fn embedding_error(message: String) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message }
}

/// Read the body of a failed response and turn it into a message.
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);
    format!("API returned {status}: {detail}")
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── Embedding ──────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the Ollama `/api/embed` endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use pdfrag::ollama::{OllamaClient, OllamaEmbeddingProvider};
///
/// let provider = OllamaEmbeddingProvider::new(OllamaClient::new("http://localhost:11434"));
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), 384);
/// ```
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingProvider {
    client: OllamaClient,
    model: String,
    dimensions: usize,
}

impl OllamaEmbeddingProvider {
    /// Create a provider using `all-minilm` (384 dimensions).
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Set the model name and the dimensionality it produces.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    /// The embedding model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| embedding_error("API returned empty response".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = PROVIDER, batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbedRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .http
            .post(self.client.url("/api/embed"))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                embedding_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let message = error_detail(response).await;
            error!(provider = PROVIDER, %message, "API error");
            return Err(embedding_error(message));
        }

        let body: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        if body.embeddings.len() != texts.len() {
            return Err(embedding_error(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                body.embeddings.len()
            )));
        }
        if let Some(bad) = body.embeddings.iter().find(|v| v.len() != self.dimensions) {
            return Err(embedding_error(format!(
                "model '{}' returned {} dimensions, expected {}",
                self.model,
                bad.len(),
                self.dimensions
            )));
        }

        Ok(body.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .list_models()
            .await
            .map(|_| ())
            .map_err(|e| embedding_error(format!("server unreachable: {e}")))
    }
}

// ── Generation ─────────────────────────────────────────────────────

/// A [`TextGenerator`] backed by the Ollama `/api/generate` endpoint.
///
/// Requests are sent with `stream: false` so the whole completion arrives
/// in a single JSON body.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaGenerator {
    /// Create a generator using `deepseek-r1:1.5b`.
    pub fn new(client: OllamaClient) -> Self {
        Self { client, model: DEFAULT_GENERATION_MODEL.into(), timeout: None }
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound each HTTP request. An elapsed request is reported as
    /// [`RagError::GenerationTimeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = PROVIDER, model = %self.model, prompt_len = prompt.len(), "generating");

        let request_body = GenerateRequest { model: &self.model, prompt, stream: false };

        let mut request = self.client.http.post(self.client.url("/api/generate")).json(&request_body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            match self.timeout {
                Some(timeout) if e.is_timeout() => RagError::generation_timeout(timeout),
                _ => generation_error(format!("request failed: {e}")),
            }
        })?;

        if !response.status().is_success() {
            let message = error_detail(response).await;
            error!(provider = PROVIDER, %message, "API error");
            return Err(generation_error(message));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            generation_error(format!("failed to parse response: {e}"))
        })?;

        Ok(body.response)
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        self.client.list_models().await
    }
}
