//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (backlog and connection limit > 0, ports valid)
//! - Check the bind address and log filter parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::Config;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint and collect the failures.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let server = &config.server;
    if server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", server.bind_address),
        ));
    }
    if server.backlog == 0 {
        errors.push(ValidationError::new("server.backlog", "must be greater than 0"));
    }
    if server.max_connections == 0 {
        errors.push(ValidationError::new("server.max_connections", "must be greater than 0"));
    }
    if let Some(tls) = &server.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("server.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("server.tls.key_path", "must not be empty"));
        }
    }

    let client = &config.client;
    if client.https_port == 0 {
        errors.push(ValidationError::new("client.https_port", "0 is not a valid port"));
    }
    if client.http_port == 0 {
        errors.push(ValidationError::new("client.http_port", "0 is not a valid port"));
    }
    if matches!(&client.ca_file, Some(path) if path.trim().is_empty()) {
        errors.push(ValidationError::new("client.ca_file", "must not be empty"));
    }

    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.observability.log_level) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("invalid filter: {e}"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
