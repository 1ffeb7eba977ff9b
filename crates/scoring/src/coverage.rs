//! Decides which of a team's required roles its members already cover.

use crate::error::{ensure_unit_interval, Result, ScoringError};
use crate::taxonomy::Taxonomy;
use crate::types::dedup_roles;
use serde::Serialize;
use std::collections::BTreeSet;

/// Threshold used when a caller has no opinion.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.45;

/// Coverage of one required role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCoverage {
    pub role: String,
    /// Number of skills the role implies.
    pub expected: usize,
    /// How many of those the team has.
    pub matched: usize,
    /// `matched / expected`.
    pub ratio: f64,
    pub filled: bool,
}

/// Required roles partitioned by whether they are covered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageSplit {
    pub filled: Vec<String>,
    pub unfilled: Vec<String>,
}

impl CoverageSplit {
    pub fn all_filled(&self) -> bool {
        self.unfilled.is_empty()
    }
}

/// Per-role coverage of `aggregate_skills` against `required_roles`.
///
/// Repeated roles are evaluated once. A role whose expected skill set is
/// empty, whether unknown or mapped to nothing, yields
/// [`ScoringError::DegenerateRoleMapping`].
pub fn coverage_report<'a, I>(
    aggregate_skills: &BTreeSet<String>,
    required_roles: I,
    threshold: f64,
    taxonomy: &Taxonomy,
) -> Result<Vec<RoleCoverage>>
where
    I: IntoIterator<Item = &'a str>,
{
    let threshold = ensure_unit_interval("role_filled_threshold", threshold)?;

    dedup_roles(required_roles)
        .into_iter()
        .map(|role| {
            let expected = match taxonomy.role_skills(role) {
                Some(skills) if !skills.is_empty() => skills,
                _ => {
                    return Err(ScoringError::DegenerateRoleMapping {
                        role: role.to_string(),
                    })
                }
            };
            let matched = expected
                .iter()
                .filter(|skill| aggregate_skills.contains(*skill))
                .count();
            let ratio = matched as f64 / expected.len() as f64;
            Ok(RoleCoverage {
                role: role.to_string(),
                expected: expected.len(),
                matched,
                ratio,
                filled: ratio >= threshold,
            })
        })
        .collect()
}

/// Partition `required_roles` into filled and unfilled.
pub fn evaluate_roles<'a, I>(
    aggregate_skills: &BTreeSet<String>,
    required_roles: I,
    threshold: f64,
    taxonomy: &Taxonomy,
) -> Result<CoverageSplit>
where
    I: IntoIterator<Item = &'a str>,
{
    let report = coverage_report(aggregate_skills, required_roles, threshold, taxonomy)?;
    let mut split = CoverageSplit::default();
    for cov in report {
        if cov.filled {
            split.filled.push(cov.role);
        } else {
            split.unfilled.push(cov.role);
        }
    }
    Ok(split)
}

/// Roles from `required_roles` whose coverage reaches `threshold`.
pub fn filled_roles<'a, I>(
    aggregate_skills: &BTreeSet<String>,
    required_roles: I,
    threshold: f64,
    taxonomy: &Taxonomy,
) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(evaluate_roles(aggregate_skills, required_roles, threshold, taxonomy)?.filled)
}

/// Complement of [`filled_roles`], in first-seen order.
pub fn unfilled_roles<'a, I>(
    aggregate_skills: &BTreeSet<String>,
    required_roles: I,
    threshold: f64,
    taxonomy: &Taxonomy,
) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(evaluate_roles(aggregate_skills, required_roles, threshold, taxonomy)?.unfilled)
}
