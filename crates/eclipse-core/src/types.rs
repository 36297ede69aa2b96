//! Oracle feed domain types.

use crate::decimal::Price;
use crate::error::CoreError;
use crate::parsing::UintWidth;
use crate::plaintext::PlaintextStruct;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric feed identifier.
///
/// Feeds also own the `feed_id .. feed_id + N` slots of the provider list,
/// so ids are plain integers rather than opaque strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(pub u64);

impl FeedId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Mapping key for this id: `"{id}field"`.
    pub fn field_key(&self) -> String {
        format!("{}field", self.0)
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FeedId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix("field").unwrap_or(trimmed);
        digits
            .parse()
            .map(Self)
            .map_err(|_| CoreError::InvalidFeedId(s.to_string()))
    }
}

impl From<u64> for FeedId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Feed configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedInfo {
    /// Creator address, empty if the struct carries none.
    pub creator: String,
    pub min_stake: u128,
    pub slashing_threshold: u128,
    /// Aggregation window in blocks.
    pub aggregation_window: u128,
    /// Challenge window in blocks.
    pub challenge_window: u128,
    pub paused: bool,
}

impl FeedInfo {
    /// Build from the `feeds` mapping value.
    ///
    /// Members are looked up by name. A member that is missing or carries
    /// the wrong type falls back to `0` / `false` / empty.
    pub fn from_mapping_value(raw: &str) -> Self {
        let fields = PlaintextStruct::parse(raw);

        let creator = fields
            .address("creator")
            .or_else(|| fields.address("owner"))
            .map(str::to_string)
            .unwrap_or_default();

        Self {
            creator,
            min_stake: fields.uint("min_stake", UintWidth::U64).unwrap_or(0),
            slashing_threshold: fields
                .uint("slashing_threshold", UintWidth::U64)
                .unwrap_or(0),
            aggregation_window: fields
                .uint("aggregation_window", UintWidth::U32)
                .unwrap_or(0),
            challenge_window: fields
                .uint("challenge_window", UintWidth::U32)
                .unwrap_or(0),
            paused: fields.boolean("paused").unwrap_or(false),
        }
    }
}

/// A staked price provider of one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub address: String,
    pub staked_credits: u128,
    /// Pending proposal, `None` when the provider has not proposed.
    pub proposed_price: Option<Price>,
}

/// One historical price observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Finalization time (RFC 3339 for numeric upstream timestamps).
    pub timestamp: String,
    pub price: Price,
}

/// Role that was slashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlashKind {
    Aggregator,
    Provider,
}

impl SlashKind {
    /// On-chain function that records this kind of slash.
    pub const fn function_name(self) -> &'static str {
        match self {
            SlashKind::Aggregator => "slash_aggregator",
            SlashKind::Provider => "slash_provider",
        }
    }
}

impl fmt::Display for SlashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlashKind::Aggregator => write!(f, "aggregator"),
            SlashKind::Provider => write!(f, "provider"),
        }
    }
}

/// A slashing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashedAddress {
    pub address: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: SlashKind,
}

/// Aggregate view of a feed.
///
/// Optional members are `None` when the corresponding mapping entry is
/// absent or could not be fetched; the two cases are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: FeedId,
    pub name: String,
    pub infos: Option<FeedInfo>,
    pub total_staked: u128,
    /// Providers in provider-list slot order.
    pub submitters: Vec<Provider>,
    /// Ascending by timestamp.
    pub price_history: Vec<PricePoint>,
    /// Ascending by date.
    pub slashed_addresses: Vec<SlashedAddress>,
    pub current_price: Option<Price>,
    pub provider_count: Option<u128>,
    pub proposal_median: Option<Price>,
    pub proposal_proposer: Option<String>,
    pub proposal_block: Option<u128>,
    pub proposal_slashed: Option<bool>,
    pub aggregate_done: Option<bool>,
    pub slasher: Option<String>,
    pub slasher_reward: Option<u128>,
    pub last_propose_block: Option<u128>,
}

impl Feed {
    /// Display name used when the caller supplies none.
    pub fn default_name(id: FeedId) -> String {
        format!("Feed {id}")
    }
}
