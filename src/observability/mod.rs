//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (peer address, connection id)
//!
//! Consumers:
//!     → logging.rs subscriber writing to stderr (pretty, compact or JSON)
//! ```

pub mod logging;
