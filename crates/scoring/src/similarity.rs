//! Cosine similarity over skill vectors and dense embeddings.
//!
//! Skill vectors are non-negative indicator vectors, so their cosine lies in
//! `[0, 1]`. Dense embeddings can point in opposite directions and produce
//! negative values.

use crate::embedding::EmbeddingError;
use crate::vectorize::vectorize;
use std::collections::BTreeSet;

/// Cosine similarity of two equally sized vectors.
///
/// Returns 0.0 when either vector has zero norm instead of propagating the
/// 0/0. Extra coordinates of the longer slice are ignored.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Cosine similarity of two embeddings, accumulated in `f64`.
///
/// Unlike [`cosine_similarity`], mismatched lengths are an error: they mean
/// the two vectors came from different models.
pub fn dense_cosine(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Cosine similarity of `subject` and `target` vectorized over `basis`,
/// multiplied by `weight`.
///
/// Skills outside `basis` are ignored on both sides. With `weight > 1` the
/// result can exceed 1.0; it is not clamped.
pub fn weighted_similarity(
    subject: &BTreeSet<String>,
    target: &BTreeSet<String>,
    basis: &BTreeSet<String>,
    weight: f64,
) -> f64 {
    let basis = basis.iter().map(String::as_str);
    let subject_vec = vectorize(subject.iter().map(String::as_str), basis.clone());
    let target_vec = vectorize(target.iter().map(String::as_str), basis);
    cosine_similarity(subject_vec.as_slice(), target_vec.as_slice()) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cosine_of_vector_with_itself_is_one() {
        let v = [1.0, 0.0, 1.0, 1.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_zero_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn partial_overlap_scenario() {
        // [1,1,0] vs [1,1,1]
        let abc = set(&["A", "B", "C"]);
        let score = weighted_similarity(&set(&["A", "B"]), &abc, &abc, 1.0);
        assert!((score - 0.816_496_580_927_726).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn disjoint_sets_score_zero() {
        let basis = set(&["A", "B", "C", "D"]);
        let score = weighted_similarity(&set(&["A", "B"]), &set(&["C", "D"]), &basis, 1.0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn identical_sets_score_one() {
        let s = set(&["Docker", "Git"]);
        assert!((weighted_similarity(&s, &s, &s, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weight_amplifies_beyond_one() {
        let s = set(&["A"]);
        let score = weighted_similarity(&s, &s, &s, 1.5);
        assert!((score - 1.5).abs() < 1e-12);
    }

    #[test]
    fn skills_outside_basis_are_ignored() {
        let basis = set(&["A", "B"]);
        let score = weighted_similarity(&set(&["A", "Z"]), &set(&["A"]), &basis, 1.0);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_basis_scores_zero() {
        let score = weighted_similarity(&set(&["A"]), &set(&["A"]), &BTreeSet::new(), 2.0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn dense_cosine_handles_opposites_and_mismatch() {
        let sim = dense_cosine(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-9);

        let err = dense_cosine(&[1.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { left: 1, right: 2 }
        ));
    }

    #[test]
    fn dense_cosine_zero_vector_is_zero() {
        assert_eq!(dense_cosine(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }
}
