//! Handler for the `serve` command.

use crate::api::AppState;
use crate::cli::ServeArgs;
use crate::engine::build_recommender;
use crate::http_transport::{serve_http, HttpSecurityConfig};
use anyhow::Result;
use tokio::runtime::Runtime;

/// Handle the `serve` command.
pub(crate) fn handle_serve_command(args: ServeArgs) -> Result<()> {
    let recommender = build_recommender(&args.engine)?;
    let security = HttpSecurityConfig {
        auth_token: args.auth_token.filter(|t| !t.is_empty()),
        cors_origins: args
            .cors_origins
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect(),
    };

    let rt = Runtime::new()?;
    rt.block_on(serve_http(AppState::new(recommender), &args.http, security))
}
