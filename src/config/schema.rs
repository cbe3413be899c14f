//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both
//! binaries. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Web server settings.
    pub server: ServerConfig,

    /// GET client settings.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Web server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:80").
    pub bind_address: String,

    /// Listen backlog passed to the socket.
    pub backlog: u32,

    /// Connections handled at once. 1 serves connections strictly in order.
    pub max_connections: usize,

    /// Optional TLS configuration. Plaintext when absent.
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:80".to_string(),
            backlog: 5,
            max_connections: 1,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Port for `https` URLs without an explicit port.
    pub https_port: u16,

    /// Port for `http` URLs without an explicit port.
    pub http_port: u16,

    /// Extra PEM trust anchors, added to the platform roots.
    pub ca_file: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            https_port: 443,
            http_port: 80,
            ca_file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_server() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "127.0.0.1:80");
        assert_eq!(config.server.backlog, 5);
        assert_eq!(config.server.max_connections, 1);
        assert!(config.server.tls.is_none());
        assert_eq!(config.client.https_port, 443);
        assert_eq!(config.client.http_port, 80);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind_address = "0.0.0.0:8080"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.backlog, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_tls_table() {
        let config: Config = toml::from_str(
            r#"
            [server.tls]
            cert_path = "cert.pem"
            key_path = "key.pem"
            "#,
        )
        .unwrap();
        let tls = config.server.tls.unwrap();
        assert_eq!(tls.cert_path, "cert.pem");
        assert_eq!(tls.key_path, "key.pem");
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let result: Result<Config, _> = toml::from_str("[observability]\nlog_format = \"xml\"\n");
        assert!(result.is_err());
    }
}
