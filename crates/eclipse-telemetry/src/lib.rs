//! Structured logging for the Eclipse oracle SDK.
//!
//! Library crates only emit `tracing` events; binaries call `init_logging`
//! once at startup.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogConfig, LogFormat, DEFAULT_FILTER};
