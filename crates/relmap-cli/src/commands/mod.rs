//! CLI command implementations for relmap.

pub mod catalog;
pub mod cloud;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use relmap_adapter_pg::{PgCatalog, PgCatalogOptions};
use relmap_core::{CloudProvider, RelmapConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file path. Defaults apply when it does not exist.
    #[arg(short, long, global = true, default_value = "relmap.yaml")]
    pub config: PathBuf,

    /// PostgreSQL connection URL. Overrides the config file.
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Schema used when a table is not qualified. Overrides `catalog.default_schema`.
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Print structured JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

/// Load the config file and apply command-line overrides.
pub fn load_config(args: &GlobalArgs) -> Result<RelmapConfig> {
    let mut config = RelmapConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config file: {}", args.config.display()))?;

    if let Some(url) = &args.database_url {
        config.upstream.database_url = Some(url.clone());
        config.upstream.database_url_env = None;
    }
    if let Some(schema) = args.schema.as_deref().filter(|s| !s.trim().is_empty()) {
        config.catalog.default_schema = schema.to_string();
    }

    Ok(config)
}

/// Connect a catalog reader for `config`.
pub async fn connect(config: &RelmapConfig) -> Result<PgCatalog> {
    let provider = CloudProvider::detect(&relmap_core::ProcessEnv);
    if let Some(warning) = provider.settings().warning {
        warn!(provider = %provider, "{}", warning);
    }

    let url = config.upstream.connection_string();
    let options = PgCatalogOptions::from_config(&config.upstream, &config.catalog);

    info!(
        project = config.project.as_deref().unwrap_or("default"),
        default_schema = %config.catalog.default_schema,
        "Connecting to upstream database"
    );

    PgCatalog::connect(&url, options)
        .await
        .context("Failed to connect to upstream database")
}
