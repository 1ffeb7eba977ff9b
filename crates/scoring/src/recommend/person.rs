use super::{finish, NotFound, Outcome, Recommender, TeamForPerson};
use crate::coverage::evaluate_roles;
use crate::error::Result;
use crate::similarity::weighted_similarity;
use crate::types::{RoleFitParams, SelectionParams, Team};
use std::collections::BTreeSet;

impl Recommender {
    /// Rank teams for a person by how well the person fills their gaps.
    ///
    /// A team with unfilled roles is scored against the skills of those
    /// roles, inside the space of all its required skills, amplified by
    /// `unfilled_role_weight`. A fully staffed team is scored against its own
    /// aggregate skills.
    pub fn recommend_teams_for_person(
        &self,
        person_skills: &BTreeSet<String>,
        teams: &[Team],
        fit: RoleFitParams,
        selection: SelectionParams,
    ) -> Result<Outcome<TeamForPerson>> {
        fit.validate()?;
        selection.validate()?;
        if teams.is_empty() {
            return Ok(Outcome::NotFound(NotFound::NoCandidates));
        }

        let taxonomy = self.taxonomy();
        let mut scored = Vec::with_capacity(teams.len());
        for team in teams {
            let aggregate = team.aggregate_skills();
            let roles = team.roles();
            let split = evaluate_roles(
                &aggregate,
                roles.iter().copied(),
                fit.role_filled_threshold,
                taxonomy,
            )?;

            let similarity = if split.all_filled() {
                weighted_similarity(person_skills, &aggregate, &aggregate, 1.0)
            } else {
                let unfilled_skills =
                    taxonomy.skills_for_roles(split.unfilled.iter().map(String::as_str));
                let required_skills = taxonomy.skills_for_roles(roles.iter().copied());
                weighted_similarity(
                    person_skills,
                    &unfilled_skills,
                    &required_skills,
                    fit.unfilled_role_weight,
                )
            };

            tracing::trace!(
                target: "crewfit::recommend",
                team_id = team.id,
                unfilled = split.unfilled.len(),
                similarity,
                "Scored team for person"
            );

            scored.push((
                TeamForPerson {
                    team_id: team.id,
                    team_name: team.name.clone(),
                    similarity,
                    filled_roles: split.filled,
                    unfilled_roles: split.unfilled,
                },
                similarity,
            ));
        }

        let outcome = finish(scored, &selection)?;
        tracing::info!(
            target: "crewfit::recommend",
            flow = "team_to_person",
            candidates = teams.len(),
            selected = outcome.matches().len(),
            "Recommendation complete"
        );
        Ok(outcome)
    }
}
