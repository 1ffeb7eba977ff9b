//! Quantile-threshold selection over candidate scores.

use crate::error::{ensure_unit_interval, Result};
use std::cmp::Ordering;

/// The `p`-quantile of `scores` by linear interpolation between the two
/// order statistics bracketing rank `p * (n - 1)`.
///
/// Non-finite scores are skipped. Returns `None` when nothing is left.
pub fn quantile(scores: &[f64], p: f64) -> Result<Option<f64>> {
    let p = ensure_unit_interval("confidence_percentile", p)?;
    let mut sorted: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
    if sorted.is_empty() {
        return Ok(None);
    }
    sorted.sort_by(f64::total_cmp);

    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Ok(Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac))
}

/// Keep the candidates scoring at or above the `p`-quantile, in input order.
///
/// Ties at the threshold are kept. A single candidate is always kept; an
/// empty input yields an empty output.
pub fn select<K>(candidates: Vec<(K, f64)>, p: f64) -> Result<Vec<(K, f64)>> {
    let scores: Vec<f64> = candidates.iter().map(|(_, s)| *s).collect();
    let Some(threshold) = quantile(&scores, p)? else {
        return Ok(Vec::new());
    };

    tracing::debug!(
        target: "crewfit::percentile",
        candidates = candidates.len(),
        percentile = p,
        threshold,
        "Computed selection threshold"
    );

    Ok(candidates
        .into_iter()
        .filter(|(_, score)| score.is_finite() && *score >= threshold)
        .collect())
}

/// Sort by descending score. Equal scores keep their input order.
pub fn rank<K>(mut candidates: Vec<(K, f64)>) -> Vec<(K, f64)> {
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    candidates
}

/// The `k` best candidates by descending score.
pub fn top_k<K>(candidates: Vec<(K, f64)>, k: usize) -> Vec<(K, f64)> {
    let mut ranked = rank(candidates);
    ranked.truncate(k);
    ranked
}
