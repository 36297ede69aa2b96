//! Feed aggregation for the Eclipse oracle.
//!
//! Combines provider, stake, proposal, configuration and history lookups
//! into a single `Feed` snapshot.

pub mod error;
pub mod service;

pub use error::{FeedError, FeedResult};
pub use service::{FeedService, DEFAULT_MAX_PROVIDERS};
