//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Client side (client.rs):
//!     url.rs (target host/path) + proxy.rs (optional proxy)
//!     → request.rs (GET request bytes)
//!     → channel → raw response copied to output
//!
//! Server side (server.rs):
//!     accepted channel
//!     → line.rs (CRLF lines)
//!     → handler.rs (request line, header skipping)
//!     → response.rs (canned response)
//! ```

pub mod client;
pub mod handler;
pub mod line;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod url;

pub use client::{fetch, ClientError, FetchRequest};
pub use handler::{HandlerError, Outcome, RequestHandler, RequestLine, RequestState};
pub use line::LineReader;
pub use proxy::{parse_proxy, Credentials, ProxySpec, ProxySpecError};
pub use request::{build_get, GetRequest, RequestError};
pub use server::HttpServer;
pub use url::{parse_url, ParsedUrl, UrlError};
