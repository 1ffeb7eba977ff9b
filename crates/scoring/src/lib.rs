//! Matching of people, teams and project cases.
//!
//! Two signals are combined:
//! - a structured score over a fixed skill vocabulary and a role→skills
//!   mapping (coverage of required roles, weighted cosine of skill vectors)
//! - a free-text score from an external embedding model, reached through
//!   the [`Embedder`] trait
//!
//! Candidates are cut at a percentile of their score distribution and
//! returned ranked. [`Recommender`] exposes the three flows.

pub mod coverage;
pub mod embedding;
pub mod error;
pub mod hybrid;
pub mod percentile;
pub mod recommend;
pub mod similarity;
pub mod taxonomy;
pub mod types;
pub mod vectorize;

pub use coverage::{
    coverage_report, evaluate_roles, filled_roles, unfilled_roles, CoverageSplit, RoleCoverage,
    DEFAULT_COVERAGE_THRESHOLD,
};
pub use embedding::{
    embedding_similarity, Embedder, Embedding, EmbeddingCache, EmbeddingError, EmbeddingOptions,
    HashingEmbedder, HttpEmbedder, HttpEmbedderConfig, DEFAULT_EMBEDDING_MODEL,
};
pub use error::{Result, ScoringError};
pub use hybrid::{hybrid, HybridScore};
pub use recommend::{CaseForTeam, NotFound, Outcome, Recommender, TeamForCase, TeamForPerson};
pub use similarity::{cosine_similarity, dense_cosine, weighted_similarity};
pub use taxonomy::{Taxonomy, TaxonomyFile, BUILTIN_VERSION};
pub use types::{Case, HybridWeights, RoleFitParams, SelectionParams, Team};
pub use vectorize::{vectorize, vectorize_roles, vectorize_skills, SkillVector};
