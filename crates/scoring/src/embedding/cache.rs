use super::{Embedder, Embedding, EmbeddingError, EmbeddingOptions};
use crate::similarity::dense_cosine;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Request-scoped memo of text embeddings.
///
/// Create one per scoring call and drop it with the response; entries are
/// never shared across requests.
pub struct EmbeddingCache<'e> {
    embedder: &'e dyn Embedder,
    options: EmbeddingOptions,
    entries: HashMap<String, Arc<Embedding>>,
}

impl<'e> EmbeddingCache<'e> {
    pub fn new(embedder: &'e dyn Embedder, options: EmbeddingOptions) -> Self {
        Self {
            embedder,
            options,
            entries: HashMap::new(),
        }
    }

    /// Number of distinct texts embedded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding of `text` if it was already fetched.
    pub fn cached(&self, text: &str) -> Option<Arc<Embedding>> {
        self.entries.get(text).cloned()
    }

    /// Embed every not-yet-cached text, at most `max_concurrency` at a time.
    ///
    /// The first failure aborts the batch; texts fetched before it stay
    /// cached, but callers are expected to discard the whole scoring call.
    pub async fn prefetch<I>(&mut self, texts: I) -> Result<(), EmbeddingError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let pending: Vec<String> = texts
            .into_iter()
            .filter(|t| !self.entries.contains_key(t) && seen.insert(t.clone()))
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            target: "crewfit::embedding",
            model = self.embedder.model_name(),
            texts = pending.len(),
            concurrency = self.options.max_concurrency,
            "Fetching embeddings"
        );

        let embedder = self.embedder;
        let timeout = self.options.timeout;
        let fetched: Vec<(String, Embedding)> = stream::iter(pending)
            .map(|text| async move {
                let vector = embed_one(embedder, &text, timeout).await?;
                Ok::<_, EmbeddingError>((text, vector))
            })
            .buffer_unordered(self.options.max_concurrency.max(1))
            .try_collect()
            .await?;

        for (text, vector) in fetched {
            self.entries.insert(text, Arc::new(vector));
        }
        Ok(())
    }

    /// Embedding of `text`, fetching it on a miss.
    pub async fn get(&mut self, text: &str) -> Result<Arc<Embedding>, EmbeddingError> {
        if let Some(hit) = self.entries.get(text) {
            return Ok(Arc::clone(hit));
        }
        let vector = Arc::new(embed_one(self.embedder, text, self.options.timeout).await?);
        self.entries.insert(text.to_string(), Arc::clone(&vector));
        Ok(vector)
    }

    /// Cosine similarity of the embeddings of two texts.
    pub async fn similarity(&mut self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        let left = self.get(a).await?;
        let right = self.get(b).await?;
        dense_cosine(&left, &right)
    }
}

/// Embed two texts and return the cosine similarity of the results.
pub async fn embedding_similarity(
    embedder: &dyn Embedder,
    text_a: &str,
    text_b: &str,
    options: EmbeddingOptions,
) -> Result<f64, EmbeddingError> {
    let mut cache = EmbeddingCache::new(embedder, options);
    cache.similarity(text_a, text_b).await
}

async fn embed_one(
    embedder: &dyn Embedder,
    text: &str,
    timeout: Duration,
) -> Result<Embedding, EmbeddingError> {
    if text.trim().is_empty() {
        return Err(EmbeddingError::EmptyText);
    }
    let vector = tokio::time::timeout(timeout, embedder.embed(text))
        .await
        .map_err(|_| EmbeddingError::Timeout {
            millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })??;
    if vector.is_empty() {
        return Err(EmbeddingError::Malformed(
            "embedding vector is empty".to_string(),
        ));
    }
    Ok(vector)
}
