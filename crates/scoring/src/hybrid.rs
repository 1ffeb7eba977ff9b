//! Linear blend of embedding and skill similarity.

use crate::types::HybridWeights;
use serde::{Deserialize, Serialize};

/// `alpha * embedding_sim + beta * skill_sim`.
///
/// The weights are not normalized; `alpha + beta` may be anything.
pub fn hybrid(embedding_sim: f64, skill_sim: f64, alpha: f64, beta: f64) -> f64 {
    alpha * embedding_sim + beta * skill_sim
}

/// The two inputs of a hybrid score and its result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridScore {
    pub embedding_similarity: f64,
    pub skills_similarity: f64,
    pub hybrid_similarity: f64,
}

impl HybridScore {
    pub fn combine(embedding_similarity: f64, skills_similarity: f64, w: HybridWeights) -> Self {
        Self {
            embedding_similarity,
            skills_similarity,
            hybrid_similarity: hybrid(embedding_similarity, skills_similarity, w.alpha, w.beta),
        }
    }
}
