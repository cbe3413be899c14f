//! GET request construction.
//!
//! # Responsibilities
//! - Render the request line in origin form, or absolute form for a proxy
//! - Add `Host`, optional `Proxy-Authorization`, and `Connection: close`
//! - Write each segment to the channel, aborting on the first failure
//!
//! # Design Decisions
//! - Rendering is pure so the same request always produces the same bytes
//! - No body is ever sent

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::proxy::{Credentials, ProxySpec};

/// Errors while sending a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The channel rejected or cut short a write.
    #[error("failed to write request: {0}")]
    Write(#[from] std::io::Error),
}

/// A GET request ready to be written to a channel.
#[derive(Debug, Clone)]
pub struct GetRequest<'a> {
    host: &'a str,
    path: &'a str,
    proxy: Option<&'a ProxySpec>,
}

impl<'a> GetRequest<'a> {
    /// `path` is given without its leading `/`.
    pub fn new(host: &'a str, path: &'a str, proxy: Option<&'a ProxySpec>) -> Self {
        Self { host, path, proxy }
    }

    fn segments(&self) -> Vec<String> {
        let mut segments = Vec::with_capacity(4);

        // A proxy needs the full URL since the socket only reaches the proxy.
        if self.proxy.is_some() {
            segments.push(format!("GET http://{}/{} HTTP/1.1\r\n", self.host, self.path));
        } else {
            segments.push(format!("GET /{} HTTP/1.1\r\n", self.path));
        }

        segments.push(format!("Host: {}\r\n", self.host));

        if let Some(credentials) = self.proxy.and_then(|p| p.credentials.as_ref()) {
            segments.push(format!(
                "Proxy-Authorization: BASIC {}\r\n",
                basic_auth_token(credentials)
            ));
        }

        segments.push("Connection: close\r\n\r\n".to_string());
        segments
    }

    /// The exact bytes [`send`](Self::send) writes.
    pub fn render(&self) -> Vec<u8> {
        self.segments().concat().into_bytes()
    }

    /// Write the request to `channel` segment by segment.
    pub async fn send<W>(&self, channel: &mut W) -> Result<(), RequestError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        for segment in self.segments() {
            channel.write_all(segment.as_bytes()).await?;
        }
        channel.flush().await?;

        tracing::debug!(host = %self.host, path = %self.path, proxied = self.proxy.is_some(), "Request sent");
        Ok(())
    }
}

/// Render and send a GET request in one step.
pub async fn build_get<W>(
    channel: &mut W,
    path: &str,
    host: &str,
    proxy: Option<&ProxySpec>,
) -> Result<(), RequestError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    GetRequest::new(host, path, proxy).send(channel).await
}

fn basic_auth_token(credentials: &Credentials) -> String {
    general_purpose::STANDARD.encode(format!("{}:{}", credentials.user, credentials.password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::proxy::parse_proxy;

    #[test]
    fn test_direct_request() {
        let bytes = GetRequest::new("www.x.com", "index.html", None).render();
        assert_eq!(
            bytes,
            b"GET /index.html HTTP/1.1\r\nHost: www.x.com\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_root_request() {
        let bytes = GetRequest::new("www.x.com", "", None).render();
        assert!(bytes.starts_with(b"GET / HTTP/1.1\r\n"));
    }

    #[test]
    fn test_proxied_request_uses_absolute_form() {
        let proxy = parse_proxy("proxy.co:8080").unwrap();
        let bytes = GetRequest::new("www.x.com", "a/b", Some(&proxy)).render();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("GET http://www.x.com/a/b HTTP/1.1\r\nHost: www.x.com\r\n"));
        assert!(!text.contains("Proxy-Authorization"));
        assert!(text.ends_with("Connection: close\r\n\r\n"));
    }

    #[test]
    fn test_proxy_credentials_header() {
        let proxy = parse_proxy("user:pass@proxy.co:8080").unwrap();
        let bytes = GetRequest::new("h", "", Some(&proxy)).render();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "GET http://h/ HTTP/1.1\r\n\
             Host: h\r\n\
             Proxy-Authorization: BASIC dXNlcjpwYXNz\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let proxy = parse_proxy("u:p@proxy.co").unwrap();
        let request = GetRequest::new("h", "p", Some(&proxy));
        assert_eq!(request.render(), request.render());
    }

    #[tokio::test]
    async fn test_send_matches_render() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        build_get(&mut first, "x", "h", None).await.unwrap();
        build_get(&mut second, "x", "h", None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, GetRequest::new("h", "x", None).render());
    }

    struct ClosedChannel;

    impl AsyncWrite for ClosedChannel {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Ok(0))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_short_write_aborts() {
        let err = build_get(&mut ClosedChannel, "", "h", None).await.unwrap_err();
        let RequestError::Write(io) = err;
        assert_eq!(io.kind(), std::io::ErrorKind::WriteZero);
    }
}
