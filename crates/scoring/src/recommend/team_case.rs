use super::{finish, CaseForTeam, NotFound, Outcome, Recommender, TeamForCase};
use crate::embedding::EmbeddingCache;
use crate::error::Result;
use crate::hybrid::HybridScore;
use crate::similarity::cosine_similarity;
use crate::types::{Case, HybridWeights, SelectionParams, Team};
use crate::vectorize::{vectorize_roles, vectorize_skills, SkillVector};
use std::iter;

impl Recommender {
    /// Rank cases for a team by hybrid embedding + skill similarity.
    ///
    /// All embeddings are fetched before any score is produced; a single
    /// embedding failure fails the whole call.
    pub async fn recommend_cases_for_team(
        &self,
        team: &Team,
        cases: &[Case],
        weights: HybridWeights,
        selection: SelectionParams,
    ) -> Result<Outcome<CaseForTeam>> {
        weights.validate()?;
        selection.validate()?;
        if cases.is_empty() {
            return Ok(Outcome::NotFound(NotFound::NoCandidates));
        }

        let team_text = team.embedding_text();
        let case_texts: Vec<String> = cases.iter().map(Case::embedding_text).collect();

        let mut cache = EmbeddingCache::new(self.embedder(), self.options());
        cache
            .prefetch(iter::once(team_text.clone()).chain(case_texts.iter().cloned()))
            .await?;

        let team_vector = self.team_vector(team);
        let mut scored = Vec::with_capacity(cases.len());
        for (case, text) in cases.iter().zip(&case_texts) {
            let embedding_sim = cache.similarity(&team_text, text).await?;
            let case_vector = vectorize_roles(case.roles(), self.taxonomy());
            let skills_sim = cosine_similarity(case_vector.as_slice(), team_vector.as_slice());
            let scores = HybridScore::combine(embedding_sim, skills_sim, weights);

            scored.push((
                CaseForTeam {
                    id: case.id,
                    title: case.title.clone(),
                    scores,
                },
                scores.hybrid_similarity,
            ));
        }

        let outcome = finish(scored, &selection)?;
        tracing::info!(
            target: "crewfit::recommend",
            flow = "case_to_team",
            team_id = team.id,
            candidates = cases.len(),
            embeddings = cache.len(),
            selected = outcome.matches().len(),
            "Recommendation complete"
        );
        Ok(outcome)
    }

    /// Rank teams for a case by hybrid embedding + skill similarity.
    pub async fn recommend_teams_for_case(
        &self,
        case: &Case,
        teams: &[Team],
        weights: HybridWeights,
        selection: SelectionParams,
    ) -> Result<Outcome<TeamForCase>> {
        weights.validate()?;
        selection.validate()?;
        if teams.is_empty() {
            return Ok(Outcome::NotFound(NotFound::NoCandidates));
        }

        let case_text = case.embedding_text();
        let team_texts: Vec<String> = teams.iter().map(Team::embedding_text).collect();

        let mut cache = EmbeddingCache::new(self.embedder(), self.options());
        cache
            .prefetch(iter::once(case_text.clone()).chain(team_texts.iter().cloned()))
            .await?;

        let case_vector = vectorize_roles(case.roles(), self.taxonomy());
        let mut scored = Vec::with_capacity(teams.len());
        for (team, text) in teams.iter().zip(&team_texts) {
            let embedding_sim = cache.similarity(&case_text, text).await?;
            let team_vector = self.team_vector(team);
            let skills_sim = cosine_similarity(case_vector.as_slice(), team_vector.as_slice());
            let scores = HybridScore::combine(embedding_sim, skills_sim, weights);

            scored.push((
                TeamForCase {
                    team_id: team.id,
                    team_name: team.name.clone(),
                    scores,
                },
                scores.hybrid_similarity,
            ));
        }

        let outcome = finish(scored, &selection)?;
        tracing::info!(
            target: "crewfit::recommend",
            flow = "team_to_case",
            case_id = case.id,
            candidates = teams.len(),
            embeddings = cache.len(),
            selected = outcome.matches().len(),
            "Recommendation complete"
        );
        Ok(outcome)
    }

    fn team_vector(&self, team: &Team) -> SkillVector {
        let aggregate = team.aggregate_skills();
        vectorize_skills(aggregate.iter().map(String::as_str), self.taxonomy())
    }
}
