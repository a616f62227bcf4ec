//! Catalog read configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to every catalog read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Schema used when a tool call does not name one.
    #[serde(default = "default_schema")]
    pub default_schema: String,

    /// Upper bound for a single catalog read. Elapsed reads fail as unavailable.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_schema: default_schema(),
            read_timeout_seconds: default_read_timeout(),
        }
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_read_timeout() -> u64 {
    30
}
