//! Client error types.
//!
//! Transport failures are not represented here: the transport logs them and
//! reports an absent value. Only construction failures and malformed
//! addresses surface as errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Address error: {0}")]
    Address(#[from] eclipse_core::CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
