//! Request/response shapes and handlers for the recommendation endpoints.
//!
//! The flow functions here are shared by the HTTP handlers and by
//! `crewfit score`, so both surfaces validate and answer identically.

use crate::validation::{
    validate_case_to_team, validate_team_to_case, validate_team_to_person, Issue, ValidationError,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use crewfit_scoring::{
    Case, CaseForTeam, HybridWeights, NotFound, Outcome, Recommender, RoleFitParams, ScoringError,
    SelectionParams, Team, TeamForCase, TeamForPerson,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

fn default_threshold() -> f64 {
    RoleFitParams::DEFAULT_THRESHOLD
}

fn default_unfilled_weight() -> f64 {
    RoleFitParams::DEFAULT_UNFILLED_WEIGHT
}

fn default_percentile() -> f64 {
    SelectionParams::DEFAULT_PERCENTILE
}

fn default_alpha() -> f64 {
    HybridWeights::default().alpha
}

fn default_beta() -> f64 {
    HybridWeights::default().beta
}

/// Body of `POST /recommend_team_to_person`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamToPersonRequest {
    pub person_skills: Vec<String>,
    pub teams: Vec<Team>,
    #[serde(default = "default_threshold")]
    pub role_filled_threshold: f64,
    #[serde(default = "default_unfilled_weight")]
    pub unfilled_role_weight: f64,
    #[serde(default = "default_percentile")]
    pub confidence_percentile: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Body of `POST /recommend_case_to_team`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseToTeamRequest {
    pub team: Team,
    pub cases: Vec<Case>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_percentile")]
    pub confidence_percentile: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Body of `POST /recommend_team_to_case`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamToCaseRequest {
    pub case: Case,
    pub teams: Vec<Team>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_percentile")]
    pub confidence_percentile: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedTeams<T> {
    pub recommended_teams: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCases {
    pub recommended_cases: Vec<CaseForTeam>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub taxonomy_version: String,
    pub vocabulary_size: usize,
    pub roles: usize,
    pub embedding_model: String,
}

/// Failure of one recommendation call, mapped onto an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No suitable {subject} found")]
    NotFound {
        subject: &'static str,
        reason: NotFound,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Scoring(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Scoring(ScoringError::EmbeddingUnavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }

    /// JSON error body: `{"detail": ...}` plus a machine-readable extra.
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::NotFound { reason, .. } => json!({
                "detail": self.to_string(),
                "reason": reason,
            }),
            Self::Invalid(e) => json!({ "detail": e.issues }),
            Self::Scoring(ScoringError::DegenerateRoleMapping { role }) => json!({
                "detail": [Issue {
                    loc: "required_roles".into(),
                    msg: format!("role '{role}' maps to no known skills"),
                }],
            }),
            other => json!({ "detail": other.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(
                target: "crewfit::http",
                status = status.as_u16(),
                error = %self,
                "Recommendation failed"
            );
        } else {
            tracing::debug!(
                target: "crewfit::http",
                status = status.as_u16(),
                error = %self,
                "Recommendation rejected"
            );
        }
        (status, Json(self.body())).into_response()
    }
}

fn found<T>(outcome: Outcome<T>, subject: &'static str) -> Result<Vec<T>, ApiError> {
    match outcome {
        Outcome::Found(items) => Ok(items),
        Outcome::NotFound(reason) => Err(ApiError::NotFound { subject, reason }),
    }
}

pub async fn team_to_person(
    recommender: &Recommender,
    req: TeamToPersonRequest,
) -> Result<RecommendedTeams<TeamForPerson>, ApiError> {
    validate_team_to_person(&req)?;
    let person: BTreeSet<String> = req.person_skills.into_iter().collect();
    let fit = RoleFitParams {
        role_filled_threshold: req.role_filled_threshold,
        unfilled_role_weight: req.unfilled_role_weight,
    };
    let selection = SelectionParams {
        confidence_percentile: req.confidence_percentile,
        min_score: req.min_score,
        limit: req.limit,
    };
    let outcome = recommender.recommend_teams_for_person(&person, &req.teams, fit, selection)?;
    Ok(RecommendedTeams {
        recommended_teams: found(outcome, "teams")?,
    })
}

pub async fn case_to_team(
    recommender: &Recommender,
    req: CaseToTeamRequest,
) -> Result<RecommendedCases, ApiError> {
    validate_case_to_team(&req)?;
    let weights = HybridWeights {
        alpha: req.alpha,
        beta: req.beta,
    };
    let selection = SelectionParams {
        confidence_percentile: req.confidence_percentile,
        min_score: req.min_score,
        limit: req.limit,
    };
    let outcome = recommender
        .recommend_cases_for_team(&req.team, &req.cases, weights, selection)
        .await?;
    Ok(RecommendedCases {
        recommended_cases: found(outcome, "cases")?,
    })
}

pub async fn team_to_case(
    recommender: &Recommender,
    req: TeamToCaseRequest,
) -> Result<RecommendedTeams<TeamForCase>, ApiError> {
    validate_team_to_case(&req)?;
    let weights = HybridWeights {
        alpha: req.alpha,
        beta: req.beta,
    };
    let selection = SelectionParams {
        confidence_percentile: req.confidence_percentile,
        min_score: req.min_score,
        limit: req.limit,
    };
    let outcome = recommender
        .recommend_teams_for_case(&req.case, &req.teams, weights, selection)
        .await?;
    Ok(RecommendedTeams {
        recommended_teams: found(outcome, "teams")?,
    })
}

pub fn health(recommender: &Recommender) -> Health {
    let taxonomy = recommender.taxonomy();
    Health {
        status: "ok".to_string(),
        taxonomy_version: taxonomy.version().to_string(),
        vocabulary_size: taxonomy.dimension(),
        roles: taxonomy.role_count(),
        embedding_model: recommender.embedder().model_name().to_string(),
    }
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}

async fn recommend_team_to_person(
    State(state): State<AppState>,
    body: Result<Json<TeamToPersonRequest>, JsonRejection>,
) -> Result<Json<RecommendedTeams<TeamForPerson>>, ApiError> {
    let Json(req) = body?;
    Ok(Json(team_to_person(&state.recommender, req).await?))
}

async fn recommend_case_to_team(
    State(state): State<AppState>,
    body: Result<Json<CaseToTeamRequest>, JsonRejection>,
) -> Result<Json<RecommendedCases>, ApiError> {
    let Json(req) = body?;
    Ok(Json(case_to_team(&state.recommender, req).await?))
}

async fn recommend_team_to_case(
    State(state): State<AppState>,
    body: Result<Json<TeamToCaseRequest>, JsonRejection>,
) -> Result<Json<RecommendedTeams<TeamForCase>>, ApiError> {
    let Json(req) = body?;
    Ok(Json(team_to_case(&state.recommender, req).await?))
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> Json<Health> {
    Json(health(&state.recommender))
}

/// The three recommendation routes, without auth or CORS.
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/recommend_team_to_person", post(recommend_team_to_person))
        .route("/recommend_case_to_team", post(recommend_case_to_team))
        .route("/recommend_team_to_case", post(recommend_team_to_case))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewfit_scoring::{EmbeddingError, HashingEmbedder, Taxonomy};
    use serde_json::json;

    fn recommender() -> Recommender {
        Recommender::new(
            Arc::new(Taxonomy::builtin()),
            Arc::new(HashingEmbedder::new(64)),
        )
    }

    #[test]
    fn request_defaults_match_documented_values() {
        let req: TeamToPersonRequest =
            serde_json::from_value(json!({"person_skills": [], "teams": []})).unwrap();
        assert_eq!(req.role_filled_threshold, 0.5);
        assert_eq!(req.unfilled_role_weight, 1.5);
        assert_eq!(req.confidence_percentile, 0.9);
        assert!(req.min_score.is_none());

        let req: TeamToCaseRequest = serde_json::from_value(json!({
            "case": {"id": 1, "title": "t", "description": "d", "required_roles": ""},
            "teams": []
        }))
        .unwrap();
        assert_eq!((req.alpha, req.beta), (0.5, 0.5));
    }

    #[tokio::test]
    async fn empty_team_list_is_not_found() {
        let err = team_to_person(
            &recommender(),
            TeamToPersonRequest {
                person_skills: vec!["Python".into()],
                teams: vec![],
                role_filled_threshold: 0.5,
                unfilled_role_weight: 1.5,
                confidence_percentile: 0.9,
                min_score: None,
                limit: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body()["reason"], "no_candidates");
        assert_eq!(err.body()["detail"], "No suitable teams found");
    }

    #[test]
    fn status_mapping() {
        let degenerate = ApiError::Scoring(ScoringError::DegenerateRoleMapping {
            role: "Ghost".into(),
        });
        assert_eq!(degenerate.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(degenerate.body()["detail"][0]["loc"], "required_roles");

        let upstream = ApiError::Scoring(ScoringError::EmbeddingUnavailable(
            EmbeddingError::Timeout { millis: 10 },
        ));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let taxonomy = ApiError::Scoring(ScoringError::InvalidTaxonomy("broken".into()));
        assert_eq!(taxonomy.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn health_reports_engine() {
        let h = health(&recommender());
        assert_eq!(h.status, "ok");
        assert_eq!(h.taxonomy_version, crewfit_scoring::BUILTIN_VERSION);
        assert_eq!(h.embedding_model, "fnv1a-hashing");
        assert!(h.vocabulary_size > 0);
    }
}
