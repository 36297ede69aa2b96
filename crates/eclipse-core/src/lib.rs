//! Core domain types for the Eclipse oracle SDK.
//!
//! This crate provides the pieces that do not touch the network:
//! - `Feed`, `FeedInfo`, `Provider`, `PricePoint`, `SlashedAddress`: feed model
//! - `Price`: fixed-point price with six implied decimals
//! - `parse_*`: loose scalar extractors over explorer mapping text
//! - `PlaintextStruct`: name-addressed access to plaintext struct members
//! - `convert_address_to_field`: bech32m address to field element

pub mod address;
pub mod decimal;
pub mod error;
pub mod parsing;
pub mod plaintext;
pub mod types;

pub use address::{convert_address_to_field, ADDRESS_HRP, ADDRESS_PREFIX};
pub use decimal::{Price, PRICE_DECIMALS};
pub use error::{CoreError, Result};
pub use parsing::{
    parse_address, parse_bool, parse_field, parse_uint, try_parse_uint, UintWidth,
};
pub use plaintext::{Literal, PlaintextStruct};
pub use types::{Feed, FeedId, FeedInfo, PricePoint, Provider, SlashKind, SlashedAddress};

/// Field element type used for mapping keys.
pub use alloy::primitives::U256;
