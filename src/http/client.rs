//! One-shot GET client.
//!
//! # Responsibilities
//! - Resolve and connect to the target host, or to the proxy when one is set
//! - Negotiate TLS for `https` (and scheme-less) URLs
//! - Send the GET request and stream the raw response to an output
//! - Map every failure to a process exit code
//!
//! # Design Decisions
//! - The response is copied byte for byte; nothing is parsed
//! - A read error after the request is sent ends the response instead of
//!   failing it

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpSocket;

use crate::config::{ClientConfig, ConfigError};
use crate::http::proxy::{parse_proxy, ProxySpec, ProxySpecError};
use crate::http::request::{GetRequest, RequestError};
use crate::http::url::{parse_url, ParsedUrl, UrlError};
use crate::net::{tls, Channel, TlsError};

/// Chunk size for copying the response.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Errors that end a client run. Each maps to an exit code.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    #[error("malformed proxy parameter '{spec}': {source}")]
    MalformedProxySpec {
        spec: String,
        #[source]
        source: ProxySpecError,
    },

    #[error("error in name resolution for '{host}': {source}")]
    NameResolution {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to create local socket: {0}")]
    SocketCreate(#[source] std::io::Error),

    #[error("unable to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to negotiate TLS connection: {0}")]
    TlsNegotiation(#[source] std::io::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),

    #[error(transparent)]
    ChannelWrite(#[from] RequestError),

    #[error("failed to write response to output: {0}")]
    Output(#[source] std::io::Error),

    #[error("error closing client connection: {0}")]
    ChannelClose(#[source] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ClientError::MalformedUrl(_) | ClientError::Config(_) | ClientError::Output(_) => 1,
            ClientError::MalformedProxySpec { .. } | ClientError::SocketCreate(_) => 2,
            ClientError::NameResolution { .. }
            | ClientError::TlsNegotiation(_)
            | ClientError::Tls(_) => 3,
            ClientError::Connect { .. } | ClientError::ChannelWrite(_) => 4,
            ClientError::ChannelClose(_) => 5,
        }
    }
}

/// What to fetch and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: ParsedUrl,
    pub proxy: Option<ProxySpec>,
}

impl FetchRequest {
    /// Parse the command-line URL and optional proxy argument. The proxy is
    /// checked first.
    pub fn parse(url: &str, proxy: Option<&str>) -> Result<Self, ClientError> {
        let proxy = proxy
            .map(|spec| {
                parse_proxy(spec).map_err(|source| ClientError::MalformedProxySpec {
                    spec: spec.to_string(),
                    source,
                })
            })
            .transpose()?;
        let url = parse_url(url)?;
        Ok(Self { url, proxy })
    }

    /// Host and port the socket connects to.
    pub fn connect_target(&self, config: &ClientConfig) -> Result<(String, u16), ClientError> {
        if let Some(proxy) = &self.proxy {
            return Ok((proxy.host.clone(), proxy.port));
        }
        let default_port = if self.url.is_tls() {
            config.https_port
        } else {
            config.http_port
        };
        Ok(self.url.endpoint(default_port)?)
    }

    /// The GET request this fetch sends.
    pub fn get_request(&self) -> GetRequest<'_> {
        GetRequest::new(&self.url.host, self.url.path_or_root(), self.proxy.as_ref())
    }
}

/// Resolve `host` and return the first address.
async fn resolve(host: &str, port: u16) -> Result<SocketAddr, ClientError> {
    let resolution_error = |source| ClientError::NameResolution {
        host: host.to_string(),
        source,
    };

    tokio::net::lookup_host((host, port))
        .await
        .map_err(resolution_error)?
        .next()
        .ok_or_else(|| {
            resolution_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses found",
            ))
        })
}

/// Fetch the document and copy the raw response into `output`.
///
/// Returns the number of response bytes received.
pub async fn fetch<W>(
    request: &FetchRequest,
    config: &ClientConfig,
    output: &mut W,
) -> Result<u64, ClientError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let (host, port) = request.connect_target(config)?;
    tracing::info!(host = %host, port, proxied = request.proxy.is_some(), "Connecting to host");

    let addr = resolve(&host, port).await?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(ClientError::SocketCreate)?;

    let stream = socket
        .connect(addr)
        .await
        .map_err(|source| ClientError::Connect { addr, source })?;

    if request.url.is_tls() {
        tracing::info!("Connection complete; negotiating TLS parameters");
        let connector = tls::load_connector(config.ca_file.as_deref().map(Path::new))?;
        let server_name = tls::server_name(&host)?;
        let tls_stream = connector
            .connect(server_name, stream)
            .await
            .map_err(ClientError::TlsNegotiation)?;
        exchange(tls_stream, request, output).await
    } else {
        exchange(stream, request, output).await
    }
}

/// Send the request over an established channel, copy the response, then
/// shut the channel down.
pub async fn exchange<S, W>(
    mut channel: S,
    request: &FetchRequest,
    output: &mut W,
) -> Result<u64, ClientError>
where
    S: Channel,
    W: AsyncWrite + Unpin + ?Sized,
{
    tracing::info!(path = %request.url.path_or_root(), "Retrieving document");
    request.get_request().send(&mut channel).await?;

    let received = display_result(&mut channel, output).await?;

    tracing::info!(bytes = received, "Shutting down");
    match channel.shutdown().await {
        Ok(()) => Ok(received),
        Err(e) if e.kind() == std::io::ErrorKind::NotConnected => {
            tracing::debug!(error = %e, "Peer already closed the connection");
            Ok(received)
        }
        Err(e) => Err(ClientError::ChannelClose(e)),
    }
}

/// Copy everything the channel sends into `output`, then a final newline.
pub async fn display_result<R, W>(channel: &mut R, output: &mut W) -> Result<u64, ClientError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match channel.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, bytes = total, "Response stream ended with an error");
                break;
            }
        };
        output.write_all(&buf[..n]).await.map_err(ClientError::Output)?;
        total += n as u64;
    }

    output.write_all(b"\n").await.map_err(ClientError::Output)?;
    output.flush().await.map_err(ClientError::Output)?;
    Ok(total)
}
