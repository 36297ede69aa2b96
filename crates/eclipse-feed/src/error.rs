//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Client error: {0}")]
    Client(#[from] eclipse_client::ClientError),
}

pub type FeedResult<T> = Result<T, FeedError>;
