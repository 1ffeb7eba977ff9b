//! Client for an OpenAI-compatible `/v1/embeddings` endpoint.
//!
//! Works with hosted APIs as well as self-hosted inference servers (for
//! example text-embeddings-inference serving `intfloat/multilingual-e5-large`).

use super::{Embedder, Embedding, EmbeddingError};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model requested when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "intfloat/multilingual-e5-large";

/// Connection settings for [`HttpEmbedder`].
///
/// Note: `Debug` is manually implemented so the API key never reaches logs.
#[derive(Clone)]
pub struct HttpEmbedderConfig {
    /// Full URL of the embeddings endpoint.
    pub endpoint: String,
    pub model: String,
    /// Sent as `Authorization: Bearer <key>` when present.
    pub api_key: Option<String>,
    /// Transport-level timeout for a single request.
    pub timeout: Duration,
}

impl std::fmt::Debug for HttpEmbedderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedderConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpEmbedderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// Remote embedder speaking the OpenAI embeddings wire format.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("crewfit-scoring/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: [text],
            });
        if let Some(key) = &self.config.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: "crewfit::embedding",
                endpoint = %self.config.endpoint,
                status = status.as_u16(),
                "Embedding service rejected request"
            );
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::Malformed("response contained no embeddings".into()))
    }
}
