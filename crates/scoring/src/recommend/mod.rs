//! Recommendation flows: person→team, team→case and case→team.
//!
//! Every flow scores all candidates, cuts the distribution at the requested
//! percentile and returns the survivors ranked by descending score.

mod person;
mod team_case;

use crate::embedding::{Embedder, EmbeddingOptions};
use crate::error::Result;
use crate::hybrid::HybridScore;
use crate::percentile;
use crate::taxonomy::Taxonomy;
use crate::types::SelectionParams;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why a flow produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFound {
    /// The request listed no candidates at all.
    NoCandidates,
    /// Candidates were scored but none survived selection.
    NoQualifyingCandidate,
}

impl NotFound {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoCandidates => "No candidates were supplied",
            Self::NoQualifyingCandidate => "No candidate met the selection threshold",
        }
    }
}

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of a flow: ranked matches, or a reportable "not found".
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(Vec<T>),
    NotFound(NotFound),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Matches, or an empty slice when nothing was found.
    pub fn matches(&self) -> &[T] {
        match self {
            Self::Found(items) => items,
            Self::NotFound(_) => &[],
        }
    }

    pub fn into_matches(self) -> Option<Vec<T>> {
        match self {
            Self::Found(items) => Some(items),
            Self::NotFound(_) => None,
        }
    }

    pub fn not_found(&self) -> Option<NotFound> {
        match self {
            Self::Found(_) => None,
            Self::NotFound(reason) => Some(*reason),
        }
    }
}

/// A team suggested to a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamForPerson {
    pub team_id: i64,
    pub team_name: String,
    pub similarity: f64,
    pub filled_roles: Vec<String>,
    pub unfilled_roles: Vec<String>,
}

/// A case suggested to a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseForTeam {
    pub id: i64,
    pub title: String,
    #[serde(flatten)]
    pub scores: HybridScore,
}

/// A team suggested for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamForCase {
    pub team_id: i64,
    pub team_name: String,
    #[serde(flatten)]
    pub scores: HybridScore,
}

/// Entry point of the scoring engine.
///
/// Holds the read-only taxonomy and a single long-lived embedder handle;
/// clone it freely, both are reference counted.
#[derive(Clone)]
pub struct Recommender {
    taxonomy: Arc<Taxonomy>,
    embedder: Arc<dyn Embedder>,
    options: EmbeddingOptions,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("taxonomy_version", &self.taxonomy.version())
            .field("embedding_model", &self.embedder.model_name())
            .field("options", &self.options)
            .finish()
    }
}

impl Recommender {
    pub fn new(taxonomy: Arc<Taxonomy>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            taxonomy,
            embedder,
            options: EmbeddingOptions::default(),
        }
    }

    /// Override embedding timeout and concurrency.
    pub fn with_options(mut self, options: EmbeddingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn options(&self) -> EmbeddingOptions {
        self.options
    }
}

/// Apply percentile, floor, ranking and limit to scored candidates.
fn finish<T>(scored: Vec<(T, f64)>, selection: &SelectionParams) -> Result<Outcome<T>> {
    let total = scored.len();
    let mut kept = percentile::select(scored, selection.confidence_percentile)?;
    if let Some(min) = selection.min_score {
        kept.retain(|(_, score)| *score >= min);
    }
    let ranked = match selection.limit {
        Some(limit) => percentile::top_k(kept, limit),
        None => percentile::rank(kept),
    };

    tracing::debug!(
        target: "crewfit::recommend",
        scored = total,
        selected = ranked.len(),
        "Selection finished"
    );

    if ranked.is_empty() {
        return Ok(Outcome::NotFound(NotFound::NoQualifyingCandidate));
    }
    Ok(Outcome::Found(ranked.into_iter().map(|(item, _)| item).collect()))
}
