//! Boundary checks on decoded request bodies.
//!
//! Every problem is collected, not just the first, and reported as a list of
//! `{loc, msg}` entries in the 422 response.

use crate::api::{CaseToTeamRequest, TeamToCaseRequest, TeamToPersonRequest};
use crewfit_scoring::Team;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Dotted path of the field, e.g. `teams.2.team_id`.
    pub loc: String,
    pub msg: String,
}

#[derive(Debug, Error)]
#[error("request failed validation: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.loc, i.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Issues(Vec<Issue>);

impl Issues {
    fn push(&mut self, loc: impl Into<String>, msg: impl Into<String>) {
        self.0.push(Issue {
            loc: loc.into(),
            msg: msg.into(),
        });
    }

    fn unit_interval(&mut self, loc: &str, value: f64) {
        if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
            self.push(loc, format!("must be between 0 and 1, got {value}"));
        }
    }

    fn non_negative(&mut self, loc: &str, value: f64) {
        if !(value.is_finite() && value >= 0.0) {
            self.push(loc, format!("must be a finite non-negative number, got {value}"));
        }
    }

    /// Each weight non-negative, and their sum finite so scores cannot overflow.
    fn hybrid_weights(&mut self, alpha: f64, beta: f64) {
        let before = self.0.len();
        self.non_negative("alpha", alpha);
        self.non_negative("beta", beta);
        if self.0.len() == before && !(alpha + beta).is_finite() {
            self.push("beta", "alpha + beta must be a finite number");
        }
    }

    fn selection(&mut self, min_score: Option<f64>, limit: Option<usize>) {
        if let Some(min) = min_score {
            if !min.is_finite() {
                self.push("min_score", "must be a finite number");
            }
        }
        if limit == Some(0) {
            self.push("limit", "must be at least 1");
        }
    }

    fn unique_team_ids(&mut self, teams: &[Team]) {
        let mut seen = HashSet::with_capacity(teams.len());
        for (i, team) in teams.iter().enumerate() {
            if !seen.insert(team.id) {
                self.push(
                    format!("teams.{i}.team_id"),
                    format!("duplicate team_id {}", team.id),
                );
            }
        }
    }

    /// Embedding a team needs at least one non-blank skill.
    fn embeddable_team(&mut self, loc: &str, team: &Team) {
        let has_skill = team
            .members
            .values()
            .flatten()
            .any(|s| !s.trim().is_empty());
        if !has_skill {
            self.push(
                format!("{loc}.skills"),
                format!("team {} lists no skills", team.id),
            );
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

pub fn validate_team_to_person(req: &TeamToPersonRequest) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    issues.unit_interval("role_filled_threshold", req.role_filled_threshold);
    issues.non_negative("unfilled_role_weight", req.unfilled_role_weight);
    issues.unit_interval("confidence_percentile", req.confidence_percentile);
    issues.selection(req.min_score, req.limit);
    issues.unique_team_ids(&req.teams);
    issues.finish()
}

pub fn validate_case_to_team(req: &CaseToTeamRequest) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    issues.hybrid_weights(req.alpha, req.beta);
    issues.unit_interval("confidence_percentile", req.confidence_percentile);
    issues.selection(req.min_score, req.limit);
    issues.embeddable_team("team", &req.team);

    let mut seen = HashSet::with_capacity(req.cases.len());
    for (i, case) in req.cases.iter().enumerate() {
        if !seen.insert(case.id) {
            issues.push(format!("cases.{i}.id"), format!("duplicate case id {}", case.id));
        }
    }
    issues.finish()
}

pub fn validate_team_to_case(req: &TeamToCaseRequest) -> Result<(), ValidationError> {
    let mut issues = Issues::default();
    issues.hybrid_weights(req.alpha, req.beta);
    issues.unit_interval("confidence_percentile", req.confidence_percentile);
    issues.selection(req.min_score, req.limit);
    issues.unique_team_ids(&req.teams);
    for (i, team) in req.teams.iter().enumerate() {
        issues.embeddable_team(&format!("teams.{i}"), team);
    }
    issues.finish()
}
