//! HTTP server accept loop.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Optionally wrap each connection in TLS
//! - Hand each connection to its own `RequestHandler`
//! - Stop on accept failure or shutdown signal, draining in-flight connections
//!
//! # Design Decisions
//! - Every connection runs on its own task with its own line buffer; the
//!   listener's permit count decides whether they overlap. One permit gives
//!   the strictly sequential behavior.
//! - Per-connection failures are logged and never end the loop

use std::net::SocketAddr;

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_rustls::TlsAcceptor;
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::http::handler::{HandlerError, Outcome, RequestHandler};
use crate::net::{tls, ConnectionId, ConnectionTracker, Listener, ListenerError, TlsError};

/// The canned-response web server.
pub struct HttpServer {
    config: ServerConfig,
    acceptor: Option<TlsAcceptor>,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Create a server, loading TLS material if the config asks for it.
    pub fn new(config: ServerConfig) -> Result<Self, TlsError> {
        let acceptor = config.tls.as_ref().map(tls::load_acceptor).transpose()?;
        Ok(Self {
            config,
            acceptor,
            tracker: ConnectionTracker::new(),
        })
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns `Ok` once `shutdown` fires (or its sender is dropped) and all
    /// in-flight connections finish; returns the error if `accept` fails.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Accept)?;
        tracing::info!(
            address = %addr,
            max_connections = self.config.max_connections,
            tls = self.acceptor.is_some(),
            "HTTP server starting"
        );

        let result = loop {
            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested, no longer accepting");
                    break Ok(());
                }
            };

            let (stream, peer_addr, permit) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!(error = %e, "Unable to accept socket");
                    break Err(e);
                }
            };

            let guard = self.tracker.track();
            let acceptor = self.acceptor.clone();
            tokio::spawn(async move {
                serve_connection(stream, peer_addr, guard.id(), acceptor).await;
                drop(permit);
                drop(guard);
            });
        };

        self.tracker.wait_for_idle().await;
        tracing::info!("HTTP server stopped");
        result
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    id: ConnectionId,
    acceptor: Option<TlsAcceptor>,
) {
    let span = tracing::info_span!("connection", connection_id = %id, peer_addr = %peer_addr);

    async move {
        let mut handler = RequestHandler::new();
        let result = match acceptor {
            Some(acceptor) => match acceptor.accept(stream).await {
                Ok(tls_stream) => handler.handle(tls_stream).await,
                Err(e) => {
                    tracing::warn!(error = %e, "TLS handshake failed");
                    return;
                }
            },
            None => handler.handle(stream).await,
        };

        match result {
            Ok(Outcome::Served) => tracing::info!("Request served"),
            Ok(Outcome::Rejected(status)) => tracing::info!(status, "Request rejected"),
            Err(HandlerError::Close(e)) => tracing::warn!(error = %e, "Unable to close connection"),
            Err(e) => tracing::warn!(error = %e, "Connection failed"),
        }
    }
    .instrument(span)
    .await
}
