//! Configuration file support for crewfit.
//!
//! Loads settings from `~/.crewfit/config.toml` (or `$CREWFIT_CONFIG`) with
//! the following precedence: CLI arguments > Environment variables > Config file
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.crewfit/config.toml
//!
//! [serve]
//! http = "127.0.0.1:8000"
//! auth_token = "your-secret-token"
//! cors_origins = "http://localhost:3000,https://app.example.com"
//!
//! [embedding]
//! backend = "http"            # or "hashing" for offline use
//! url = "http://127.0.0.1:8080/v1/embeddings"
//! model = "intfloat/multilingual-e5-large"
//! api_key = "sk-..."
//! timeout_ms = 30000
//! max_concurrency = 4
//! dimension = 384             # hashing backend only
//!
//! [taxonomy]
//! path = "/etc/crewfit/taxonomy.toml"
//!
//! [log]
//! format = "json"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_CONFIG: &str = "CREWFIT_CONFIG";
pub const ENV_HTTP: &str = "CREWFIT_HTTP";
pub const ENV_AUTH_TOKEN: &str = "CREWFIT_AUTH_TOKEN";
pub const ENV_CORS_ORIGINS: &str = "CREWFIT_CORS_ORIGINS";
pub const ENV_EMBEDDER: &str = "CREWFIT_EMBEDDER";
pub const ENV_EMBEDDING_URL: &str = "CREWFIT_EMBEDDING_URL";
pub const ENV_EMBEDDING_MODEL: &str = "CREWFIT_EMBEDDING_MODEL";
pub const ENV_EMBEDDING_API_KEY: &str = "CREWFIT_EMBEDDING_API_KEY";
pub const ENV_EMBEDDING_TIMEOUT_MS: &str = "CREWFIT_EMBEDDING_TIMEOUT_MS";
pub const ENV_EMBEDDING_CONCURRENCY: &str = "CREWFIT_EMBEDDING_CONCURRENCY";
pub const ENV_HASHING_DIM: &str = "CREWFIT_HASHING_DIM";
pub const ENV_TAXONOMY: &str = "CREWFIT_TAXONOMY";
pub const ENV_LOG_FORMAT: &str = "CREWFIT_LOG_FORMAT";

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub serve: ServeConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Configuration for the serve command.
///
/// Note: `Debug` is manually implemented so the auth token is never logged.
#[derive(Default, Deserialize)]
pub struct ServeConfig {
    /// Bind address for the HTTP transport.
    pub http: Option<String>,
    /// Bearer token for HTTP authentication.
    pub auth_token: Option<String>,
    /// Comma-separated list of allowed CORS origins.
    pub cors_origins: Option<String>,
}

impl std::fmt::Debug for ServeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeConfig")
            .field("http", &self.http)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

/// Embedding collaborator settings.
#[derive(Default, Deserialize)]
pub struct EmbeddingConfig {
    /// `http` or `hashing`.
    pub backend: Option<String>,
    pub url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_concurrency: Option<usize>,
    pub dimension: Option<usize>,
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("backend", &self.backend)
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_ms", &self.timeout_ms)
            .field("max_concurrency", &self.max_concurrency)
            .field("dimension", &self.dimension)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TaxonomyConfig {
    /// TOML taxonomy file; the built-in table is used when absent.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `text` or `json`.
    pub format: Option<String>,
}

/// Returns the path to the config file.
fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(ENV_CONFIG) {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|h| h.join(".crewfit").join("config.toml"))
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
/// fails to parse.
pub fn load_config() -> Result<Option<Config>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    tracing::debug!(
        target: "crewfit::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Applies configuration file settings to environment variables.
///
/// Only sets environment variables that are not already set, preserving
/// the precedence: CLI > ENV > config file. Call before parsing CLI
/// arguments so clap's `env` fallbacks pick the values up.
///
/// A file that exists but cannot be read or parsed is an error; nothing
/// from it is applied.
pub fn apply_config_to_env() -> Result<()> {
    if let Some(config) = load_config()? {
        apply(&config);
    }
    Ok(())
}

fn set_if_absent(key: &str, value: &str) {
    if std::env::var_os(key).is_none() {
        std::env::set_var(key, value);
        tracing::trace!(
            target: "crewfit::config",
            key,
            "Set environment variable from config file"
        );
    }
}

fn apply(config: &Config) {
    let serve = &config.serve;
    if let Some(ref http) = serve.http {
        set_if_absent(ENV_HTTP, http);
    }
    if let Some(ref token) = serve.auth_token {
        set_if_absent(ENV_AUTH_TOKEN, token);
    }
    if let Some(ref origins) = serve.cors_origins {
        set_if_absent(ENV_CORS_ORIGINS, origins);
    }

    let embedding = &config.embedding;
    if let Some(ref backend) = embedding.backend {
        set_if_absent(ENV_EMBEDDER, backend);
    }
    if let Some(ref url) = embedding.url {
        set_if_absent(ENV_EMBEDDING_URL, url);
    }
    if let Some(ref model) = embedding.model {
        set_if_absent(ENV_EMBEDDING_MODEL, model);
    }
    if let Some(ref key) = embedding.api_key {
        set_if_absent(ENV_EMBEDDING_API_KEY, key);
    }
    if let Some(ms) = embedding.timeout_ms {
        set_if_absent(ENV_EMBEDDING_TIMEOUT_MS, &ms.to_string());
    }
    if let Some(n) = embedding.max_concurrency {
        set_if_absent(ENV_EMBEDDING_CONCURRENCY, &n.to_string());
    }
    if let Some(dim) = embedding.dimension {
        set_if_absent(ENV_HASHING_DIM, &dim.to_string());
    }

    if let Some(ref path) = config.taxonomy.path {
        set_if_absent(ENV_TAXONOMY, &path.to_string_lossy());
    }
    if let Some(ref format) = config.log.format {
        set_if_absent(ENV_LOG_FORMAT, format);
    }
}
