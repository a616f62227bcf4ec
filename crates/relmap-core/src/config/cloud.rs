//! Cloud provider detection.
//!
//! The hosting platform is detected from well-known environment variables and
//! used to assemble a connection string when none is configured explicitly.
//! Only the GCP (Cloud SQL) path is considered tested; AWS and Azure carry a
//! warning that is logged at startup.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Source of environment variables. Injectable so detection can be tested.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`EnvSource::var`], treating empty values as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Hosting platform of the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Gcp,
    Aws,
    Azure,
    Local,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CloudProvider::Gcp => "gcp",
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Local => "local",
        };
        f.write_str(name)
    }
}

/// Provider specific notes surfaced to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudSettings {
    pub provider: CloudProvider,
    pub tested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
    pub recommendations: Vec<&'static str>,
}

impl CloudProvider {
    /// Detect the provider; the first matching rule wins.
    pub fn detect(env: &dyn EnvSource) -> Self {
        if env.non_empty("CLOUD_SQL_CONNECTION_NAME").is_some() {
            return CloudProvider::Gcp;
        }
        if env.non_empty("AWS_EXECUTION_ENV").is_some()
            || env.non_empty("AWS_RDS_ENDPOINT").is_some()
        {
            return CloudProvider::Aws;
        }
        if env.non_empty("WEBSITE_INSTANCE_ID").is_some()
            || env.non_empty("AZURE_POSTGRES_HOST").is_some()
        {
            return CloudProvider::Azure;
        }
        CloudProvider::Local
    }

    /// Connection string for this provider, if the environment carries enough
    /// information to build one.
    pub fn connection_string(self, env: &dyn EnvSource) -> Option<String> {
        match self {
            CloudProvider::Gcp => gcp_connection_string(env),
            CloudProvider::Aws => aws_connection_string(env),
            CloudProvider::Azure => azure_connection_string(env),
            CloudProvider::Local => env.non_empty("DATABASE_URL"),
        }
    }

    pub fn settings(self) -> CloudSettings {
        let (tested, warning, recommendations) = match self {
            CloudProvider::Gcp => (
                true,
                None,
                vec![
                    "Use Cloud SQL PostgreSQL 13+",
                    "Enable automated backups",
                    "Use Cloud SQL Proxy for secure connections",
                    "Configure VPC for private IP if needed",
                ],
            ),
            CloudProvider::Aws => (
                false,
                Some("AWS deployment is experimental and untested"),
                vec![
                    "Use RDS PostgreSQL 13+",
                    "Enable automated backups",
                    "Configure VPC security groups appropriately",
                    "Consider using RDS Proxy for connection pooling",
                ],
            ),
            CloudProvider::Azure => (
                false,
                Some("Azure deployment is experimental and untested"),
                vec![
                    "Use Azure Database for PostgreSQL Flexible Server",
                    "Enable SSL enforcement",
                    "Configure firewall rules appropriately",
                    "Consider using connection pooling",
                ],
            ),
            CloudProvider::Local => (false, None, Vec::new()),
        };

        CloudSettings {
            provider: self,
            tested,
            warning,
            recommendations,
        }
    }
}

fn gcp_connection_string(env: &dyn EnvSource) -> Option<String> {
    let connection_name = env.non_empty("CLOUD_SQL_CONNECTION_NAME")?;
    let user = env.non_empty("DB_USER").unwrap_or_else(|| "synthea-user".to_string());
    let password = env.var("DB_PASSWORD").unwrap_or_default();
    let database = env.non_empty("DB_NAME").unwrap_or_else(|| "synthea".to_string());

    if password.is_empty() {
        tracing::warn!("DB_PASSWORD not set, Cloud SQL connection may fail");
    }

    Some(format!(
        "postgresql://{}:{}@/{}?host=/cloudsql/{}",
        user, password, database, connection_name
    ))
}

fn aws_connection_string(env: &dyn EnvSource) -> Option<String> {
    let Some(endpoint) = env.non_empty("AWS_RDS_ENDPOINT") else {
        tracing::error!("AWS_RDS_ENDPOINT not set");
        return None;
    };
    let port = env.non_empty("AWS_RDS_PORT").unwrap_or_else(|| "5432".to_string());
    let user = env.non_empty("DB_USER").unwrap_or_else(|| "postgres".to_string());
    let password = env.var("DB_PASSWORD").unwrap_or_default();
    let database = env.non_empty("DB_NAME").unwrap_or_else(|| "synthea".to_string());

    if env
        .var("AWS_RDS_USE_IAM")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    {
        tracing::warn!("AWS RDS IAM authentication is not supported, using password authentication");
    }

    let ssl_required = env
        .var("AWS_RDS_SSL")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(true);
    let ssl_mode = if ssl_required { "require" } else { "prefer" };

    Some(format!(
        "postgresql://{}:{}@{}:{}/{}?sslmode={}",
        user, password, endpoint, port, database, ssl_mode
    ))
}

fn azure_connection_string(env: &dyn EnvSource) -> Option<String> {
    let Some(host) = env.non_empty("AZURE_POSTGRES_HOST") else {
        tracing::error!("AZURE_POSTGRES_HOST not set");
        return None;
    };
    let port = env.non_empty("AZURE_POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
    let password = env.var("DB_PASSWORD").unwrap_or_default();
    let database = env.non_empty("DB_NAME").unwrap_or_else(|| "synthea".to_string());

    // Single-server Azure expects user@servername.
    let user = match env.non_empty("DB_USER") {
        Some(user) if !user.contains('@') => {
            let server = host.split('.').next().unwrap_or(&host);
            format!("{}@{}", user, server)
        }
        Some(user) => user,
        None => String::new(),
    };

    Some(format!(
        "postgresql://{}:{}@{}:{}/{}?sslmode=require",
        user, password, host, port, database
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_detect_priority() {
        let all = env(&[
            ("CLOUD_SQL_CONNECTION_NAME", "proj:region:inst"),
            ("AWS_RDS_ENDPOINT", "db.rds.amazonaws.com"),
            ("AZURE_POSTGRES_HOST", "srv.postgres.database.azure.com"),
        ]);
        assert_eq!(CloudProvider::detect(&all), CloudProvider::Gcp);

        let aws = env(&[("AWS_EXECUTION_ENV", "AWS_ECS_FARGATE"), ("WEBSITE_INSTANCE_ID", "x")]);
        assert_eq!(CloudProvider::detect(&aws), CloudProvider::Aws);

        let azure = env(&[("WEBSITE_INSTANCE_ID", "abc")]);
        assert_eq!(CloudProvider::detect(&azure), CloudProvider::Azure);

        assert_eq!(CloudProvider::detect(&env(&[])), CloudProvider::Local);
        assert_eq!(
            CloudProvider::detect(&env(&[("CLOUD_SQL_CONNECTION_NAME", "")])),
            CloudProvider::Local
        );
    }

    #[test]
    fn test_gcp_connection_string_defaults() {
        let vars = env(&[
            ("CLOUD_SQL_CONNECTION_NAME", "proj:us-central1:db"),
            ("DB_PASSWORD", "s3cret"),
        ]);
        assert_eq!(
            CloudProvider::Gcp.connection_string(&vars).as_deref(),
            Some("postgresql://synthea-user:s3cret@/synthea?host=/cloudsql/proj:us-central1:db")
        );
    }

    #[test]
    fn test_aws_connection_string() {
        let vars = env(&[
            ("AWS_RDS_ENDPOINT", "db.abc.rds.amazonaws.com"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "shop"),
        ]);
        assert_eq!(
            CloudProvider::Aws.connection_string(&vars).as_deref(),
            Some("postgresql://app:pw@db.abc.rds.amazonaws.com:5432/shop?sslmode=require")
        );

        let no_ssl = env(&[("AWS_RDS_ENDPOINT", "db"), ("AWS_RDS_SSL", "false")]);
        assert!(CloudProvider::Aws
            .connection_string(&no_ssl)
            .unwrap()
            .ends_with("sslmode=prefer"));

        assert_eq!(CloudProvider::Aws.connection_string(&env(&[("AWS_EXECUTION_ENV", "x")])), None);
    }

    #[test]
    fn test_azure_user_gets_server_suffix() {
        let vars = env(&[
            ("AZURE_POSTGRES_HOST", "myserver.postgres.database.azure.com"),
            ("DB_USER", "admin"),
            ("DB_PASSWORD", "pw"),
        ]);
        assert_eq!(
            CloudProvider::Azure.connection_string(&vars).as_deref(),
            Some("postgresql://admin@myserver:pw@myserver.postgres.database.azure.com:5432/synthea?sslmode=require")
        );

        let qualified = env(&[("AZURE_POSTGRES_HOST", "h.example"), ("DB_USER", "admin@other")]);
        assert!(CloudProvider::Azure
            .connection_string(&qualified)
            .unwrap()
            .starts_with("postgresql://admin@other:"));
    }

    #[test]
    fn test_local_uses_database_url() {
        let vars = env(&[("DATABASE_URL", "postgres://localhost/dev")]);
        assert_eq!(
            CloudProvider::Local.connection_string(&vars).as_deref(),
            Some("postgres://localhost/dev")
        );
        assert_eq!(CloudProvider::Local.connection_string(&env(&[])), None);
    }

    #[test]
    fn test_settings() {
        assert!(CloudProvider::Gcp.settings().tested);
        assert!(CloudProvider::Gcp.settings().warning.is_none());
        assert!(!CloudProvider::Aws.settings().tested);
        assert!(CloudProvider::Azure.settings().warning.is_some());
        assert!(CloudProvider::Local.settings().recommendations.is_empty());
    }
}
