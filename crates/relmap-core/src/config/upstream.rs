//! Upstream database configuration types.
//!
//! Connection settings are resolved in this order:
//! 1. `database_url_env` - reference an environment variable
//! 2. `database_url` - provide the URL directly
//! 3. Cloud provider detection (Cloud SQL, RDS, Azure) when `detect_cloud` is on
//! 4. Individual fields (host, port, database, username, password)

use super::cloud::{CloudProvider, EnvSource, ProcessEnv};
use serde::{Deserialize, Serialize};

/// Configuration for the upstream Postgres connection.
///
/// See the module docs for the order in which connection sources are tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Environment variable name containing the PostgreSQL connection URL.
    /// Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url_env: Option<String>,

    /// Full PostgreSQL connection URL.
    /// Second precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Build the connection string from the detected cloud provider.
    #[serde(default = "default_detect_cloud")]
    pub detect_cloud: bool,

    /// Hostname of the upstream Postgres server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the upstream Postgres server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name to connect to.
    #[serde(default = "default_database")]
    pub database: String,

    /// Username for upstream connection.
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for upstream connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable containing the password. Takes precedence over `password`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// SSL mode for the connection.
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Connection pool configuration.
    #[serde(default)]
    pub pool: ConnectionPoolConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            database_url_env: None,
            database_url: None,
            detect_cloud: default_detect_cloud(),
            host: default_host(),
            port: default_port(),
            database: default_database(),
            username: default_username(),
            password: None,
            password_env: None,
            ssl_mode: SslMode::default(),
            pool: ConnectionPoolConfig::default(),
        }
    }
}

/// SSL mode for database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    /// Disable SSL.
    Disable,
    /// Allow SSL but don't require it.
    Allow,
    /// Prefer SSL (default).
    #[default]
    Prefer,
    /// Require SSL.
    Require,
    /// Require SSL with CA verification.
    #[serde(rename = "verify-ca")]
    VerifyCa,
    /// Require SSL with full verification.
    #[serde(rename = "verify-full")]
    VerifyFull,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

/// Connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionPoolConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout in seconds when acquiring a connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Build a PostgreSQL connection string from the process environment.
    pub fn connection_string(&self) -> String {
        self.connection_string_from(&ProcessEnv)
    }

    /// Build a PostgreSQL connection string, reading variables from `env`.
    pub fn connection_string_from(&self, env: &dyn EnvSource) -> String {
        if let Some(url) = self
            .database_url_env
            .as_deref()
            .and_then(|var| env.non_empty(var))
        {
            return url;
        }

        if let Some(url) = &self.database_url {
            return url.clone();
        }

        if self.detect_cloud {
            let provider = CloudProvider::detect(env);
            if provider != CloudProvider::Local {
                if let Some(url) = provider.connection_string(env) {
                    tracing::info!(provider = %provider, "Using cloud provider connection settings");
                    return url;
                }
            }
        }

        let credentials = match self.get_password(env) {
            Some(password) => format!("{}:{}", self.username, password),
            None => self.username.clone(),
        };
        let mut url = format!(
            "postgresql://{}@{}:{}/{}",
            credentials, self.host, self.port, self.database
        );
        if self.ssl_mode != SslMode::Prefer {
            url.push_str("?sslmode=");
            url.push_str(self.ssl_mode.as_str());
        }
        url
    }

    fn get_password(&self, env: &dyn EnvSource) -> Option<String> {
        if let Some(password) = self.password_env.as_deref().and_then(|var| env.var(var)) {
            return Some(password);
        }
        self.password.clone()
    }

    /// Check if this configuration uses environment variables.
    pub fn uses_env_credentials(&self) -> bool {
        self.database_url_env.is_some() || self.password_env.is_some()
    }
}

fn default_detect_cloud() -> bool {
    true
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_username() -> String {
    "postgres".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}
