//! Per-connection request handling.
//!
//! # State Machine
//! ```text
//! AwaitRequestLine ──GET──▶ AwaitHeaders ──blank line──▶ Respond(200) ──▶ Closed
//!        │                                                   ▲
//!        └──────────────other method────▶ Respond(501) ──────┘
//! ```
//!
//! # Design Decisions
//! - Header lines are drained and discarded unparsed
//! - A rejected method gets its response without reading further lines
//! - The channel is shut down on every path, including I/O failures

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::line::LineReader;
use crate::http::response::{error_response, success_response};

/// Status sent for any method other than GET.
pub const NOT_IMPLEMENTED: u16 = 501;

/// Errors while serving a connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to read request: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write response: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to close connection: {0}")]
    Close(#[source] std::io::Error),

    #[error("connection already closed")]
    Closed,
}

/// How a connection was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The canned page was sent.
    Served,
    /// An error status was sent; carries the status code.
    Rejected(u16),
}

/// Where a connection is in its request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    AwaitRequestLine,
    AwaitHeaders,
    Respond(Outcome),
    Closed,
}

/// First line of a request split on whitespace. Missing parts are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let mut next = || parts.next().unwrap_or_default().to_string();
        Self {
            method: next(),
            target: next(),
            version: next(),
        }
    }
}

/// Drives one connection from request line to close.
#[derive(Debug)]
pub struct RequestHandler {
    reader: LineReader,
    state: RequestState,
}

impl RequestHandler {
    pub fn new() -> Self {
        Self {
            reader: LineReader::new(),
            state: RequestState::AwaitRequestLine,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Read the request and write the response, leaving the channel open.
    pub async fn process<S>(&mut self, channel: &mut S) -> Result<Outcome, HandlerError>
    where
        S: AsyncRead + AsyncWrite + Unpin + ?Sized,
    {
        loop {
            match self.state {
                RequestState::AwaitRequestLine => {
                    let line = self.reader.read_line(channel).await.map_err(HandlerError::Read)?;
                    let request_line = RequestLine::parse(&line);

                    // Only GET is supported.
                    if line.starts_with("GET") {
                        tracing::debug!(
                            method = %request_line.method,
                            target = %request_line.target,
                            version = %request_line.version,
                            "Request line received"
                        );
                        self.state = RequestState::AwaitHeaders;
                    } else {
                        tracing::warn!(method = %request_line.method, "Unsupported method");
                        self.state = RequestState::Respond(Outcome::Rejected(NOT_IMPLEMENTED));
                    }
                }
                RequestState::AwaitHeaders => {
                    let mut skipped = 0usize;
                    loop {
                        let line = self.reader.read_line(channel).await.map_err(HandlerError::Read)?;
                        if line.is_empty() {
                            break;
                        }
                        skipped += 1;
                    }
                    tracing::trace!(headers = skipped, "Headers skipped");
                    self.state = RequestState::Respond(Outcome::Served);
                }
                RequestState::Respond(outcome) => {
                    let response = match outcome {
                        Outcome::Served => success_response(),
                        Outcome::Rejected(status) => error_response(status),
                    };
                    channel.write_all(&response).await.map_err(HandlerError::Write)?;
                    channel.flush().await.map_err(HandlerError::Write)?;
                    return Ok(outcome);
                }
                RequestState::Closed => return Err(HandlerError::Closed),
            }
        }
    }

    /// Process the request, then shut the channel down whatever happened.
    ///
    /// When processing fails the close result is only logged and the
    /// processing error is returned.
    pub async fn handle<S>(&mut self, mut channel: S) -> Result<Outcome, HandlerError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let processed = self.process(&mut channel).await;
        let closed = channel.shutdown().await;
        self.state = RequestState::Closed;

        match (processed, closed) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => Err(HandlerError::Close(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                tracing::warn!(error = %close_err, "Unable to close connection");
                Err(e)
            }
        }
    }
}

impl Default for RequestHandler {
    fn default() -> Self {
        Self::new()
    }
}
