//! Outer surfaces of crewfit: the HTTP recommendation API, configuration,
//! logging and the command-line handlers.
//!
//! The main entry point is [`run`], which the `crewfit` binary calls. The
//! scoring itself lives in `crewfit-scoring`.

pub mod api;
pub mod cli;
mod commands;
pub mod config;
pub mod engine;
pub mod http_transport;
pub mod logging;
mod signals;
pub mod validation;

pub use commands::score_request;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

/// Parse the command line and dispatch.
///
/// Config-file values are exported to the environment first so clap's `env`
/// fallbacks see them; explicit flags and existing env vars still win. An
/// unreadable config file aborts the run once logging is up.
pub fn run() -> Result<()> {
    let config_loaded = config::apply_config_to_env();

    let cli = Cli::parse();
    logging::init(cli.log_format);

    if let Err(e) = config_loaded {
        tracing::error!(
            target: "crewfit::config",
            error = %format!("{e:#}"),
            "Configuration file is invalid"
        );
        return Err(e);
    }

    let command = match cli.command {
        Some(command) => command,
        // A bare `crewfit` serves with defaults.
        None => match Cli::parse_from(["crewfit", "serve"]).command {
            Some(command) => command,
            None => anyhow::bail!("failed to build default serve command"),
        },
    };

    match command {
        Commands::Serve(args) => {
            tracing::debug!(target: "crewfit::cli", ?args, "Dispatching serve");
            commands::handle_serve_command(args)
        }
        Commands::Score {
            flow,
            request,
            pretty,
            engine,
        } => commands::handle_score_command(flow, &request, pretty, &engine),
        Commands::Taxonomy { format, taxonomy } => {
            commands::handle_taxonomy_command(format, taxonomy)
        }
    }
}
