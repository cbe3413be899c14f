//! HTTP proxy specification parsing.
//!
//! Accepts `[http://][user:password@]host[:port][/]`. The scheme prefix is
//! optional, the port defaults to 80, and credentials must come as a pair.

use thiserror::Error;

/// Port used when the specification does not name one.
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// Errors produced by [`parse_proxy`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxySpecError {
    /// A username was given without a `:password` before the `@`.
    #[error("expected password in '{0}'")]
    MissingPassword(String),

    /// The port was zero, empty, out of range or not a number.
    #[error("invalid proxy port '{0}'")]
    InvalidPort(String),

    /// Nothing left to use as the proxy host.
    #[error("missing proxy host")]
    EmptyHost,
}

/// Proxy login sent as `Proxy-Authorization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// A parsed proxy specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySpec {
    pub host: String,
    pub port: u16,
    pub credentials: Option<Credentials>,
}

/// Parse a `-p` proxy argument.
pub fn parse_proxy(raw: &str) -> Result<ProxySpec, ProxySpecError> {
    let mut spec = raw.strip_prefix("http://").unwrap_or(raw);

    let mut credentials = None;
    if let Some(at) = spec.find('@') {
        let colon = spec
            .find(':')
            .filter(|colon| *colon < at)
            .ok_or_else(|| ProxySpecError::MissingPassword(spec.to_string()))?;
        credentials = Some(Credentials {
            user: spec[..colon].to_string(),
            password: spec[colon + 1..at].to_string(),
        });
        spec = &spec[at + 1..];
    }

    // Anything from the first slash on is ignored, mostly a trailing "/".
    if let Some(slash) = spec.find('/') {
        spec = &spec[..slash];
    }

    let (host, port) = match spec.split_once(':') {
        Some((host, port)) => {
            let port = Some(port)
                .filter(|port| port.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|port| port.parse::<u16>().ok())
                .filter(|port| *port != 0)
                .ok_or_else(|| ProxySpecError::InvalidPort(port.to_string()))?;
            (host, port)
        }
        None => (spec, DEFAULT_PROXY_PORT),
    };

    if host.is_empty() {
        return Err(ProxySpecError::EmptyHost);
    }

    Ok(ProxySpec {
        host: host.to_string(),
        port,
        credentials,
    })
}
