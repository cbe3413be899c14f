//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Server:
//!     listener.rs (bind with backlog, accept loop, connection limits)
//!     → tls.rs (optional TLS handshake)
//!     → connection.rs (id, lifecycle tracking)
//!     → Hand off to HTTP layer as a Channel
//!
//! Client:
//!     resolve → connect → tls.rs (optional handshake) → Channel
//! ```
//!
//! # Design Decisions
//! - The HTTP layer only sees `Channel`, so plaintext and TLS streams share
//!   one code path
//! - TLS is optional and handled transparently

use tokio::io::{AsyncRead, AsyncWrite};

pub mod connection;
pub mod listener;
pub mod tls;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{ConnectionPermit, Listener, ListenerError};
pub use tls::TlsError;

/// A bidirectional byte stream, plaintext or encrypted.
///
/// send = `write_all`, receive = `read` (0 once closed), shutdown =
/// `AsyncWriteExt::shutdown`.
pub trait Channel: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Channel for T where T: AsyncRead + AsyncWrite + Unpin + Send {}
