//! Deterministic feature-hashing embedder.
//!
//! No model, no network: lowercase word tokens are hashed with FNV-1a into a
//! fixed number of signed buckets and the result is L2-normalized. Good enough
//! for offline runs and tests; it captures lexical overlap, not meaning.

use super::{Embedder, Embedding, EmbeddingError};
use async_trait::async_trait;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashingEmbedder {
    /// Embedder with `dim` buckets (at least one).
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Synchronous embedding used by the trait impl.
    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dim];
        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        "fnv1a-hashing"
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.embed_text(text))
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::dense_cosine;

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a(b""), FNV_OFFSET);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn embedding_is_deterministic_and_normalized() {
        let e = HashingEmbedder::default();
        let a = e.embed_text("Python Docker Kubernetes");
        let b = e.embed_text("Python Docker Kubernetes");
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tokenization_ignores_case_and_punctuation() {
        let e = HashingEmbedder::new(64);
        assert_eq!(e.embed_text("Docker, GIT"), e.embed_text("docker git"));
    }

    #[test]
    fn shared_tokens_raise_similarity() {
        let e = HashingEmbedder::default();
        let team = e.embed_text("Python Django SQL Docker");
        let close = e.embed_text("Backend in Python and Django with SQL");
        let far = e.embed_text("Figma Canva Photoshop");
        let near_sim = dense_cosine(&team, &close).unwrap();
        let far_sim = dense_cosine(&team, &far).unwrap();
        assert!(near_sim > far_sim, "{near_sim} <= {far_sim}");
    }

    #[test]
    fn punctuation_only_text_is_zero_vector() {
        let e = HashingEmbedder::new(8);
        assert!(e.embed_text("| | |").iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn trait_embed_matches_sync_path() {
        let e = HashingEmbedder::new(32);
        assert_eq!(e.embed("C# .NET").await.unwrap(), e.embed_text("C# .NET"));
        assert_eq!(e.model_name(), "fnv1a-hashing");
    }
}
