//! Error types for eclipse-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid address: expected prefix {expected:?}")]
    InvalidAddressPrefix { expected: &'static str },

    #[error("Failed to decode bech32m address: {0}")]
    AddressDecode(String),

    #[error("Invalid Aleo address prefix: expected {expected:?}, got {actual:?}")]
    AddressHrpMismatch {
        expected: &'static str,
        actual: String,
    },

    #[error("Address payload too large for a field element: {0} bytes")]
    AddressPayloadTooLarge(usize),

    #[error("Invalid feed id: {0}")]
    InvalidFeedId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
