//! # relmap-core
//!
//! Configuration shared by the relmap crates: upstream connection settings,
//! cloud provider detection, catalog defaults and MCP transport selection.

pub mod config;

pub use config::{
    CatalogConfig, CloudProvider, CloudSettings, ConfigError, EnvSource, McpConfig, ProcessEnv,
    RelmapConfig, SslMode, Transport, UpstreamConfig,
};
