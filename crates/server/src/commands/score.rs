//! Handler for the `score` command: one request in, one response out.

use crate::api::{self, ApiError};
use crate::cli::{EngineArgs, Flow};
use crate::engine::build_recommender;
use anyhow::{bail, Context, Result};
use axum::http::StatusCode;
use crewfit_scoring::Recommender;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;
use tokio::runtime::Runtime;

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Rejected {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: format!("invalid request body: {e}"),
    })
}

/// Run `flow` on a raw JSON request body, returning the response body.
pub async fn score_request(
    recommender: &Recommender,
    flow: Flow,
    body: &str,
) -> Result<serde_json::Value, ApiError> {
    let value = match flow {
        Flow::TeamToPerson => {
            serde_json::to_value(api::team_to_person(recommender, parse(body)?).await?)
        }
        Flow::CaseToTeam => serde_json::to_value(api::case_to_team(recommender, parse(body)?).await?),
        Flow::TeamToCase => serde_json::to_value(api::team_to_case(recommender, parse(body)?).await?),
    };
    value.map_err(|e| ApiError::Rejected {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("failed to encode response: {e}"),
    })
}

fn read_request(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read request from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))
    }
}

/// Handle the `score` command.
pub(crate) fn handle_score_command(
    flow: Flow,
    request: &Path,
    pretty: bool,
    engine: &EngineArgs,
) -> Result<()> {
    let body = read_request(request)?;
    let recommender = build_recommender(engine)?;

    let rt = Runtime::new()?;
    match rt.block_on(score_request(&recommender, flow, &body)) {
        Ok(response) => {
            let rendered = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{rendered}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.body());
            bail!("{} ({})", e, e.status())
        }
    }
}
