use crate::config::{
    ENV_AUTH_TOKEN, ENV_CORS_ORIGINS, ENV_EMBEDDER, ENV_EMBEDDING_API_KEY,
    ENV_EMBEDDING_CONCURRENCY, ENV_EMBEDDING_MODEL, ENV_EMBEDDING_TIMEOUT_MS, ENV_EMBEDDING_URL,
    ENV_HASHING_DIM, ENV_HTTP, ENV_LOG_FORMAT, ENV_TAXONOMY,
};
use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crewfit_scoring::DEFAULT_EMBEDDING_MODEL;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_EMBEDDING_URL: &str = "http://127.0.0.1:8080/v1/embeddings";

/// Command-line interface for the `crewfit` application.
#[derive(Debug, Parser)]
#[command(
    name = "crewfit",
    version,
    about = "Match people, teams and project cases by skills and text similarity"
)]
pub struct Cli {
    /// Log output format.
    #[arg(long, global = true, env = ENV_LOG_FORMAT, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available `crewfit` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Runs the HTTP recommendation server.
    Serve(ServeArgs),
    /// Scores one JSON request offline and prints the response.
    Score {
        /// Which recommendation to compute.
        #[arg(value_enum)]
        flow: Flow,
        /// Request body file, or `-` for stdin.
        #[arg(long, short, value_name = "FILE", default_value = "-")]
        request: PathBuf,
        /// Pretty-print the JSON response.
        #[arg(long, default_value_t = false)]
        pretty: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Prints the loaded skill vocabulary and role table.
    Taxonomy {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Taxonomy TOML file (built-in table when omitted).
        #[arg(long, env = ENV_TAXONOMY, value_name = "FILE")]
        taxonomy: Option<PathBuf>,
    },
}

/// Arguments of `crewfit serve`.
#[derive(Clone, Args)]
pub struct ServeArgs {
    /// Bind address for the HTTP server.
    #[arg(long, env = ENV_HTTP, default_value = DEFAULT_BIND, value_name = "ADDR")]
    pub http: String,
    /// Require `Authorization: Bearer <token>` on recommendation endpoints.
    #[arg(long, env = ENV_AUTH_TOKEN, hide_env_values = true)]
    pub auth_token: Option<String>,
    /// Allowed CORS origins (comma-separated, `*` for any).
    #[arg(long, env = ENV_CORS_ORIGINS, value_delimiter = ',')]
    pub cors_origins: Vec<String>,
    #[command(flatten)]
    pub engine: EngineArgs,
}

impl std::fmt::Debug for ServeArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeArgs")
            .field("http", &self.http)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cors_origins", &self.cors_origins)
            .field("engine", &self.engine)
            .finish()
    }
}

/// Recommendation flow selector for `crewfit score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Flow {
    /// Teams for a person (`/recommend_team_to_person`).
    TeamToPerson,
    /// Cases for a team (`/recommend_case_to_team`).
    CaseToTeam,
    /// Teams for a case (`/recommend_team_to_case`).
    TeamToCase,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Embedding backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
    /// OpenAI-compatible embeddings endpoint.
    #[default]
    Http,
    /// Deterministic offline feature hashing.
    Hashing,
}

/// Settings shared by every command that scores.
///
/// Note: `Debug` is manually implemented so the API key is never logged.
#[derive(Clone, Args)]
pub struct EngineArgs {
    /// Taxonomy TOML file (built-in table when omitted).
    #[arg(long, env = ENV_TAXONOMY, value_name = "FILE")]
    pub taxonomy: Option<PathBuf>,
    /// Embedding backend.
    #[arg(long, env = ENV_EMBEDDER, value_enum, default_value_t = EmbedderKind::Http)]
    pub embedder: EmbedderKind,
    /// Embeddings endpoint URL.
    #[arg(long, env = ENV_EMBEDDING_URL, default_value = DEFAULT_EMBEDDING_URL)]
    pub embedding_url: String,
    /// Model name sent to the embeddings endpoint.
    #[arg(long, env = ENV_EMBEDDING_MODEL, default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,
    /// API key for the embeddings endpoint.
    #[arg(long, env = ENV_EMBEDDING_API_KEY, hide_env_values = true)]
    pub embedding_api_key: Option<String>,
    /// Per-call embedding timeout in milliseconds.
    #[arg(long, env = ENV_EMBEDDING_TIMEOUT_MS, default_value_t = 30_000, value_name = "MILLIS")]
    pub embedding_timeout_ms: u64,
    /// Maximum embedding calls in flight per request.
    #[arg(long, env = ENV_EMBEDDING_CONCURRENCY, default_value_t = 4)]
    pub embedding_concurrency: usize,
    /// Vector size for the hashing backend.
    #[arg(long, env = ENV_HASHING_DIM, default_value_t = 384)]
    pub hashing_dim: usize,
}

impl std::fmt::Debug for EngineArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineArgs")
            .field("taxonomy", &self.taxonomy)
            .field("embedder", &self.embedder)
            .field("embedding_url", &self.embedding_url)
            .field("embedding_model", &self.embedding_model)
            .field(
                "embedding_api_key",
                &self.embedding_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("embedding_timeout_ms", &self.embedding_timeout_ms)
            .field("embedding_concurrency", &self.embedding_concurrency)
            .field("hashing_dim", &self.hashing_dim)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewfit_test_utils::{env_guard, set_env_var};
    use serial_test::serial;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("crewfit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    #[serial]
    fn serve_defaults() {
        let _g = env_guard();
        let _a = set_env_var(ENV_HTTP, None);
        let _b = set_env_var(ENV_AUTH_TOKEN, None);
        let _c = set_env_var(ENV_CORS_ORIGINS, None);
        let _d = set_env_var(ENV_EMBEDDER, None);

        let cli = parse(&["serve"]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.http, DEFAULT_BIND);
        assert!(args.auth_token.is_none());
        assert!(args.cors_origins.is_empty());
        assert_eq!(args.engine.embedder, EmbedderKind::Http);
        assert_eq!(args.engine.embedding_model, DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    #[serial]
    fn env_fills_serve_args_and_flags_win() {
        let _g = env_guard();
        let _a = set_env_var(ENV_HTTP, Some("0.0.0.0:9000"));
        let _b = set_env_var(ENV_CORS_ORIGINS, Some("http://a.test,http://b.test"));
        let _d = set_env_var(ENV_EMBEDDER, Some("hashing"));

        let cli = parse(&["serve", "--http", "127.0.0.1:7000"]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.http, "127.0.0.1:7000");
        assert_eq!(args.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(args.engine.embedder, EmbedderKind::Hashing);
    }

    #[test]
    #[serial]
    fn score_parses_flow_and_request() {
        let _g = env_guard();
        let _d = set_env_var(ENV_EMBEDDER, None);

        let cli = parse(&[
            "score",
            "team-to-case",
            "--request",
            "req.json",
            "--embedder",
            "hashing",
        ]);
        match cli.command {
            Some(Commands::Score {
                flow,
                request,
                engine,
                ..
            }) => {
                assert_eq!(flow, Flow::TeamToCase);
                assert_eq!(request, PathBuf::from("req.json"));
                assert_eq!(engine.embedder, EmbedderKind::Hashing);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_flow_is_rejected() {
        assert!(Cli::try_parse_from(["crewfit", "score", "person-to-case"]).is_err());
    }

    #[test]
    fn engine_debug_redacts_key() {
        let cli = parse(&["score", "case-to-team", "--embedding-api-key", "sk-live"]);
        let rendered = format!("{cli:?}");
        assert!(!rendered.contains("sk-live"));
        assert!(rendered.contains("[REDACTED]"));

        let cli = parse(&["serve", "--auth-token", "tok-live"]);
        assert!(!format!("{cli:?}").contains("tok-live"));
    }
}
