//! Entities and tunable parameters shared across the scoring modules.

use crate::error::{ensure_non_negative, ensure_unit_interval, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A team: named members with their skills, plus the roles it still needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "team_id")]
    pub id: i64,
    pub name: String,
    /// Member name to that member's skills.
    #[serde(rename = "skills")]
    pub members: BTreeMap<String, Vec<String>>,
    /// Roles the team needs covered. `null` and a missing field both mean none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub required_roles: Vec<String>,
}

impl Team {
    /// Union of every member's skills.
    pub fn aggregate_skills(&self) -> BTreeSet<String> {
        self.members.values().flatten().cloned().collect()
    }

    /// Required roles with duplicates removed, first occurrence kept.
    pub fn roles(&self) -> Vec<&str> {
        dedup_roles(self.required_roles.iter().map(String::as_str))
    }

    /// Free text handed to the embedding model.
    ///
    /// Skills are emitted in sorted order so identical teams always produce
    /// identical text (and hit the same cache entry).
    pub fn embedding_text(&self) -> String {
        self.aggregate_skills()
            .into_iter()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A project case looking for a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Roles as a single comma-separated string, e.g. `"DevOps, Frontend"`.
    pub required_roles: String,
}

impl Case {
    /// Parsed required roles, duplicates removed.
    pub fn roles(&self) -> Vec<&str> {
        dedup_roles(parse_roles(&self.required_roles))
    }

    /// Free text handed to the embedding model.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} | {} | Required roles: {}",
            self.title, self.description, self.required_roles
        )
    }
}

/// Split a comma-separated role list, trimming whitespace and skipping blanks.
pub fn parse_roles(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|r| !r.is_empty())
}

/// Remove repeated roles while keeping the original order.
pub fn dedup_roles<'a>(roles: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    roles.into_iter().filter(|r| seen.insert(*r)).collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Knobs of the person-to-team flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleFitParams {
    /// Minimum coverage ratio for a role to count as filled.
    pub role_filled_threshold: f64,
    /// Amplification applied when scoring against unfilled roles.
    pub unfilled_role_weight: f64,
}

impl RoleFitParams {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_UNFILLED_WEIGHT: f64 = 1.5;

    pub fn validate(&self) -> Result<()> {
        ensure_unit_interval("role_filled_threshold", self.role_filled_threshold)?;
        ensure_non_negative("unfilled_role_weight", self.unfilled_role_weight)?;
        Ok(())
    }
}

impl Default for RoleFitParams {
    fn default() -> Self {
        Self {
            role_filled_threshold: Self::DEFAULT_THRESHOLD,
            unfilled_role_weight: Self::DEFAULT_UNFILLED_WEIGHT,
        }
    }
}

/// Blend weights of the hybrid combiner.
///
/// Both weights are non-negative and `alpha + beta` must be finite, which
/// bounds every hybrid score by `alpha + beta` in absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridWeights {
    /// Weight of the embedding similarity.
    pub alpha: f64,
    /// Weight of the skill-vector similarity.
    pub beta: f64,
}

impl HybridWeights {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("alpha", self.alpha)?;
        ensure_non_negative("beta", self.beta)?;
        let sum = self.alpha + self.beta;
        if !sum.is_finite() {
            return Err(crate::ScoringError::InvalidParameter {
                name: "alpha + beta",
                value: sum,
                expected: "expected a finite sum",
            });
        }
        Ok(())
    }
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
        }
    }
}

/// How the final candidate list is cut down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    /// Quantile of the score distribution a candidate must reach.
    pub confidence_percentile: f64,
    /// Optional absolute floor applied after the percentile cut.
    pub min_score: Option<f64>,
    /// Optional cap on the number of returned candidates.
    pub limit: Option<usize>,
}

impl SelectionParams {
    pub const DEFAULT_PERCENTILE: f64 = 0.9;

    pub fn validate(&self) -> Result<()> {
        ensure_unit_interval("confidence_percentile", self.confidence_percentile)?;
        if let Some(min) = self.min_score {
            if !min.is_finite() {
                return Err(crate::ScoringError::InvalidParameter {
                    name: "min_score",
                    value: min,
                    expected: "expected a finite number",
                });
            }
        }
        Ok(())
    }
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            confidence_percentile: Self::DEFAULT_PERCENTILE,
            min_score: None,
            limit: None,
        }
    }
}
