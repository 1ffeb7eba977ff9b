//! Adapter around the external text-embedding collaborator.
//!
//! The model itself lives elsewhere. This module defines the [`Embedder`]
//! seam, two implementations of it, and the request-scoped
//! [`EmbeddingCache`] that guarantees each distinct text is embedded once per
//! scoring call.

mod cache;
mod hashing;
mod http;

pub use cache::{embedding_similarity, EmbeddingCache};
pub use hashing::HashingEmbedder;
pub use http::{HttpEmbedder, HttpEmbedderConfig, DEFAULT_EMBEDDING_MODEL};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Dense embedding vector.
pub type Embedding = Vec<f32>;

/// Failures of the embedding collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmbeddingError {
    /// Empty or whitespace-only input; the model has nothing to encode.
    #[error("cannot embed empty text")]
    EmptyText,

    #[error("embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("embedding service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),

    #[error("embedding call exceeded {millis} ms")]
    Timeout { millis: u64 },

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// Converts text into a fixed-length vector.
///
/// Implementations must be deterministic for identical input and cheap to
/// share: one long-lived instance serves every request.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model, for logs and health output.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}

/// Limits applied to embedding calls within one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingOptions {
    /// Upper bound on a single embed call.
    pub timeout: Duration,
    /// Maximum number of embed calls in flight at once.
    pub max_concurrency: usize,
}

impl EmbeddingOptions {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
        }
    }
}
