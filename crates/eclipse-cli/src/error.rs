//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] eclipse_feed::FeedError),

    #[error("Client error: {0}")]
    Client(#[from] eclipse_client::ClientError),

    #[error("Address error: {0}")]
    Address(#[from] eclipse_core::CoreError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] eclipse_telemetry::TelemetryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
