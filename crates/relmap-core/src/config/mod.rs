//! Configuration types for relmap.
//!
//! Configuration is loaded from a single YAML file (`relmap.yaml` by default).
//! Every section is optional; a missing file yields the defaults.
//!
//! ```yaml
//! upstream:
//!   database_url_env: DATABASE_URL
//! catalog:
//!   default_schema: public
//!   read_timeout_seconds: 30
//! mcp:
//!   transport: stdio
//! ```

pub mod catalog;
pub mod cloud;
pub mod mcp;
pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use catalog::CatalogConfig;
pub use cloud::{CloudProvider, CloudSettings, EnvSource, ProcessEnv};
pub use mcp::{McpConfig, Transport};
pub use upstream::{ConnectionPoolConfig, SslMode, UpstreamConfig};

/// Complete relmap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelmapConfig {
    /// Project name, used in logs only.
    #[serde(default)]
    pub project: Option<String>,

    /// Upstream Postgres connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Catalog read defaults.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// MCP server configuration.
    #[serde(default)]
    pub mcp: McpConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelmapConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.default_schema.trim().is_empty() {
            return Err(ConfigError::Config(
                "catalog.default_schema must not be empty".to_string(),
            ));
        }
        if self.catalog.read_timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "catalog.read_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.upstream.pool.max_connections == 0 {
            return Err(ConfigError::Config(
                "upstream.pool.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
