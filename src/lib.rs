//! Minimal HTTP over plaintext and TLS sockets.
//!
//! # Architecture Overview
//!
//! ```text
//!   tinyweb-get                                   tinyweb
//!   ───────────                                   ───────
//!   url + proxy parsing                           net::listener (bind, backlog, permits)
//!        │                                              │
//!   resolve → connect → [TLS]                     [TLS accept]
//!        │                                              │
//!   http::request (GET bytes) ───── channel ─────▶ http::handler
//!        │                                         (line reader, header skip)
//!   raw response → stdout    ◀──── channel ─────── http::response (canned page / 501)
//! ```
//!
//! Cross-cutting: `config` (TOML, validated), `observability` (tracing
//! subscriber), `lifecycle` (shutdown signal).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::Config;
pub use http::{ClientError, FetchRequest, HttpServer};
pub use lifecycle::Shutdown;
