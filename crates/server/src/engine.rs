//! Builds the long-lived [`Recommender`] from CLI/env settings.

use crate::cli::{EmbedderKind, EngineArgs};
use anyhow::{Context, Result};
use crewfit_scoring::{
    Embedder, EmbeddingOptions, HashingEmbedder, HttpEmbedder, HttpEmbedderConfig, Recommender,
    Taxonomy,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Load the taxonomy file, or the built-in table when no path is given.
pub fn load_taxonomy(path: Option<&Path>) -> Result<Taxonomy> {
    match path {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("failed to load taxonomy from {}", path.display())),
        None => {
            let taxonomy = Taxonomy::builtin();
            tracing::info!(
                target: "crewfit::engine",
                version = taxonomy.version(),
                skills = taxonomy.dimension(),
                roles = taxonomy.role_count(),
                "Using built-in taxonomy"
            );
            Ok(taxonomy)
        }
    }
}

/// Construct the embedder selected by `args`.
pub fn build_embedder(args: &EngineArgs) -> Result<Arc<dyn Embedder>> {
    match args.embedder {
        EmbedderKind::Http => {
            let config = HttpEmbedderConfig {
                endpoint: args.embedding_url.clone(),
                model: args.embedding_model.clone(),
                api_key: args.embedding_api_key.clone(),
                timeout: Duration::from_millis(args.embedding_timeout_ms),
            };
            tracing::info!(
                target: "crewfit::engine",
                endpoint = %config.endpoint,
                model = %config.model,
                "Using HTTP embedder"
            );
            let embedder = HttpEmbedder::new(config).context("failed to build HTTP client")?;
            Ok(Arc::new(embedder))
        }
        EmbedderKind::Hashing => {
            let embedder = HashingEmbedder::new(args.hashing_dim);
            tracing::info!(
                target: "crewfit::engine",
                dimension = embedder.dimension(),
                "Using hashing embedder"
            );
            Ok(Arc::new(embedder))
        }
    }
}

/// Assemble taxonomy, embedder and limits into one shared engine.
pub fn build_recommender(args: &EngineArgs) -> Result<Recommender> {
    let taxonomy = load_taxonomy(args.taxonomy.as_deref())?;
    let embedder = build_embedder(args)?;
    let options = EmbeddingOptions {
        timeout: Duration::from_millis(args.embedding_timeout_ms),
        max_concurrency: args.embedding_concurrency.max(1),
    };
    Ok(Recommender::new(Arc::new(taxonomy), embedder).with_options(options))
}
