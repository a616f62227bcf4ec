//! MCP server configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Transport type: "stdio" or "http".
    #[serde(default)]
    pub transport: Transport,

    /// HTTP host (only used when transport is HTTP).
    #[serde(default = "default_http_host")]
    pub host: String,

    /// HTTP port (only used when transport is HTTP).
    #[serde(default = "default_http_port")]
    pub port: u16,
}

/// MCP transport type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Standard input/output transport (for desktop MCP clients).
    #[default]
    Stdio,
    /// HTTP transport.
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => f.write_str("stdio"),
            Transport::Http => f.write_str("http"),
        }
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            other => Err(format!("unknown transport '{}', expected stdio or http", other)),
        }
    }
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

impl McpConfig {
    /// Socket address for the HTTP transport.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_http(&self) -> bool {
        self.transport == Transport::Http
    }
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_from_str() {
        assert_eq!("HTTP".parse::<Transport>(), Ok(Transport::Http));
        assert_eq!("stdio".parse::<Transport>(), Ok(Transport::Stdio));
        assert!("grpc".parse::<Transport>().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = McpConfig {
            transport: Transport::Http,
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert!(config.is_http());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
