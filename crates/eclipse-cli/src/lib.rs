//! Eclipse oracle command-line reader.
//!
//! Loads an `AppConfig`, builds a `FeedService` over HTTP and prints feed
//! snapshots, price history, slashing events or address fields as JSON.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{execute, Cli, Command};
pub use config::{AppConfig, FeedDefaults, DEFAULT_CONFIG_PATH};
pub use error::{AppError, AppResult};
