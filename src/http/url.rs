//! URL decomposition into host and path.
//!
//! Only the `scheme://host[:port]/path` shape is understood. Anything before
//! `//` is treated as the scheme, everything up to the next `/` is the host,
//! and the remainder is the path.

use thiserror::Error;

/// Errors produced by [`parse_url`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// No `//` separator in the input.
    #[error("malformed URL '{0}': expected scheme separator '//'")]
    MissingSchemeSeparator(String),

    /// Nothing between `//` and the path.
    #[error("malformed URL '{0}': empty host")]
    EmptyHost(String),

    /// The host carried a `:port` suffix that is not a valid port.
    #[error("malformed URL host '{0}': invalid port")]
    InvalidPort(String),
}

/// A URL split into its connection-relevant parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Text before `//` without its trailing `:`, if any.
    pub scheme: Option<String>,
    /// Authority as written, including any explicit port.
    pub host: String,
    /// Path after the host's `/`. `None` means the root document.
    pub path: Option<String>,
}

impl ParsedUrl {
    /// Whether the scheme asks for a TLS channel. A missing scheme defaults
    /// to TLS.
    pub fn is_tls(&self) -> bool {
        !matches!(self.scheme.as_deref(), Some(s) if s.eq_ignore_ascii_case("http"))
    }

    /// Path as used on the request line (without the leading `/`).
    pub fn path_or_root(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }

    /// Split the host into a hostname and port, using `default_port` when the
    /// URL does not name one.
    pub fn endpoint(&self, default_port: u16) -> Result<(String, u16), UrlError> {
        // Bracketed IPv6 literals carry colons of their own.
        if let Some(rest) = self.host.strip_prefix('[') {
            let (addr, tail) = rest
                .split_once(']')
                .ok_or_else(|| UrlError::InvalidPort(self.host.clone()))?;
            let port = match tail.strip_prefix(':') {
                Some(port) => parse_port(port).ok_or_else(|| UrlError::InvalidPort(self.host.clone()))?,
                None if tail.is_empty() => default_port,
                None => return Err(UrlError::InvalidPort(self.host.clone())),
            };
            return Ok((addr.to_string(), port));
        }

        match self.host.rsplit_once(':') {
            Some((name, port)) => {
                let port = parse_port(port).ok_or_else(|| UrlError::InvalidPort(self.host.clone()))?;
                Ok((name.to_string(), port))
            }
            None => Ok((self.host.clone(), default_port)),
        }
    }
}

fn parse_port(text: &str) -> Option<u16> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u16>().ok().filter(|port| *port != 0)
}

/// Split `raw` into scheme, host and path.
pub fn parse_url(raw: &str) -> Result<ParsedUrl, UrlError> {
    let (prefix, rest) = raw
        .split_once("//")
        .ok_or_else(|| UrlError::MissingSchemeSeparator(raw.to_string()))?;

    let (host, path) = match rest.split_once('/') {
        Some((host, path)) => (host, Some(path.to_string())),
        None => (rest, None),
    };

    if host.is_empty() {
        return Err(UrlError::EmptyHost(raw.to_string()));
    }

    let scheme = prefix.strip_suffix(':').unwrap_or(prefix);
    let scheme = (!scheme.is_empty()).then(|| scheme.to_string());

    Ok(ParsedUrl {
        scheme,
        host: host.to_string(),
        path,
    })
}
