//! Explorer mapping client.
//!
//! Reads oracle state from program mappings exposed by the explorer REST API
//! at `{base_url}/{network}/program/{program}/mapping/{mapping}/{key}`.
//!
//! Keys are either `{feed_id}field` or, for per-provider entries,
//! `{address_field + feed_id}field`.

use crate::config::{ClientConfig, Network, ProgramIds};
use crate::error::ClientResult;
use crate::transport::{HttpTransport, Transport};
use eclipse_core::{
    convert_address_to_field, parse_address, parse_bool, parse_field, parse_uint, FeedId,
    FeedInfo, Price, UintWidth, U256,
};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Mapping names used by the oracle programs.
pub mod mappings {
    pub const PROVIDER_LIST: &str = "provider_list";
    pub const STAKES: &str = "stakes";
    pub const TOTAL_STAKED: &str = "total_staked";
    pub const PROVIDER_COUNT: &str = "provider_count";
    pub const TEMP_PRICE: &str = "temp_price";
    pub const LATEST_PRICE: &str = "latest_price";
    pub const FEEDS: &str = "feeds";
    pub const PROPOSAL_MEDIAN: &str = "proposal_median";
    pub const PROPOSAL_PROPOSER: &str = "proposal_proposer";
    pub const PROPOSAL_BLOCK: &str = "proposal_block";
    pub const PROPOSAL_SLASHED: &str = "proposal_slashed";
    pub const AGGREGATE_DONE: &str = "aggregate_done";
    pub const SLASHER: &str = "slasher";
    pub const SLASHER_REWARD: &str = "slasher_reward";
    pub const LAST_PROPOSE_BLOCK: &str = "last_propose_block";
}

/// Key for an `(account, feed)` pair: `{address_field + feed_id}field`.
///
/// # Errors
/// Fails if `address` is not a valid Aleo address.
pub fn provider_feed_key(address: &str, feed_id: FeedId) -> ClientResult<String> {
    let field = convert_address_to_field(address)?;
    let key = field.wrapping_add(U256::from(feed_id.value()));
    Ok(format!("{key}field"))
}

/// Client for oracle program mappings.
#[derive(Clone)]
pub struct ExplorerClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    network: Network,
    programs: ProgramIds,
}

impl std::fmt::Debug for ExplorerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerClient")
            .field("base_url", &self.base_url)
            .field("network", &self.network)
            .field("programs", &self.programs)
            .finish_non_exhaustive()
    }
}

impl ExplorerClient {
    /// Create a client over HTTP.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            network: config.network,
            programs: config.programs.clone(),
        }
    }

    /// Shared transport, for building sibling clients.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.programs
    }

    /// Full URL of a mapping entry.
    pub fn mapping_url(&self, program: &str, mapping: &str, key: &str) -> String {
        format!(
            "{}/{}/program/{program}/mapping/{mapping}/{key}",
            self.base_url, self.network
        )
    }

    /// Raw mapping value, `None` if absent or unreachable.
    pub async fn get_mapping_value(
        &self,
        program: &str,
        mapping: &str,
        key: &str,
    ) -> Option<String> {
        let url = self.mapping_url(program, mapping, key);
        let value = self.transport.get_text(url).await;
        debug!(program, mapping, key, found = value.is_some(), "Mapping lookup");
        value
    }

    async fn feed_value(&self, program: &str, mapping: &str, feed_id: FeedId) -> Option<String> {
        self.get_mapping_value(program, mapping, &feed_id.field_key())
            .await
    }

    /// Provider addresses from slots `feed_id .. feed_id + max_providers`.
    ///
    /// Slots without a parseable address are dropped; order follows the slots.
    /// Probing stops at the last representable slot id.
    pub async fn get_feed_providers(&self, feed_id: FeedId, max_providers: usize) -> Vec<String> {
        let slots = (0..max_providers as u64)
            .map_while(|offset| feed_id.value().checked_add(offset).map(FeedId::new));

        let lookups = slots.map(|slot| {
            async move {
                let raw = self
                    .feed_value(&self.programs.staking, mappings::PROVIDER_LIST, slot)
                    .await;
                parse_address(raw.as_deref())
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// Credits staked by `address` on `feed_id` (`0` if none).
    pub async fn get_provider_stake(&self, address: &str, feed_id: FeedId) -> ClientResult<u128> {
        let key = provider_feed_key(address, feed_id)?;
        let raw = self
            .get_mapping_value(&self.programs.staking, mappings::STAKES, &key)
            .await;
        Ok(parse_uint(raw.as_deref(), UintWidth::U128))
    }

    /// Pending price proposed by `address` on `feed_id`.
    pub async fn get_provider_proposed_price(
        &self,
        address: &str,
        feed_id: FeedId,
    ) -> ClientResult<Option<Price>> {
        let key = provider_feed_key(address, feed_id)?;
        let raw = self
            .get_mapping_value(&self.programs.submit, mappings::TEMP_PRICE, &key)
            .await;
        Ok(raw.and_then(|raw| Price::from_micro(parse_uint(Some(raw.as_str()), UintWidth::U128))))
    }

    /// Total credits staked on the feed (`0` if none).
    pub async fn get_total_staked(&self, feed_id: FeedId) -> u128 {
        let raw = self
            .feed_value(&self.programs.staking, mappings::TOTAL_STAKED, feed_id)
            .await;
        parse_uint(raw.as_deref(), UintWidth::U128)
    }

    /// Latest aggregated price.
    pub async fn get_current_price(&self, feed_id: FeedId) -> Option<Price> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::LATEST_PRICE, feed_id)
            .await?;
        Price::from_micro(parse_uint(Some(raw.as_str()), UintWidth::U128))
    }

    /// Feed configuration, `None` if the feed is not registered.
    pub async fn get_feed_info(&self, feed_id: FeedId) -> Option<FeedInfo> {
        let raw = self
            .feed_value(&self.programs.feed, mappings::FEEDS, feed_id)
            .await?;
        Some(FeedInfo::from_mapping_value(&raw))
    }

    pub async fn get_provider_count(&self, feed_id: FeedId) -> Option<u128> {
        let raw = self
            .feed_value(&self.programs.staking, mappings::PROVIDER_COUNT, feed_id)
            .await;
        parse_field(raw.as_deref())
    }

    /// Median of the open proposal. A zero median is reported as `None`.
    pub async fn get_proposal_median(&self, feed_id: FeedId) -> Option<Price> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::PROPOSAL_MEDIAN, feed_id)
            .await;
        match parse_field(raw.as_deref()) {
            Some(0) | None => None,
            Some(median) => Price::from_micro(median),
        }
    }

    pub async fn get_proposal_proposer(&self, feed_id: FeedId) -> Option<String> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::PROPOSAL_PROPOSER, feed_id)
            .await;
        parse_address(raw.as_deref())
    }

    pub async fn get_proposal_block(&self, feed_id: FeedId) -> Option<u128> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::PROPOSAL_BLOCK, feed_id)
            .await;
        parse_field(raw.as_deref())
    }

    pub async fn get_proposal_slashed(&self, feed_id: FeedId) -> Option<bool> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::PROPOSAL_SLASHED, feed_id)
            .await;
        parse_bool(raw.as_deref())
    }

    pub async fn get_aggregate_done(&self, feed_id: FeedId) -> Option<bool> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::AGGREGATE_DONE, feed_id)
            .await;
        parse_bool(raw.as_deref())
    }

    pub async fn get_slasher(&self, feed_id: FeedId) -> Option<String> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::SLASHER, feed_id)
            .await;
        parse_address(raw.as_deref())
    }

    pub async fn get_slasher_reward(&self, feed_id: FeedId) -> Option<u128> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::SLASHER_REWARD, feed_id)
            .await;
        parse_field(raw.as_deref())
    }

    pub async fn get_last_propose_block(&self, feed_id: FeedId) -> Option<u128> {
        let raw = self
            .feed_value(&self.programs.aggregate, mappings::LAST_PROPOSE_BLOCK, feed_id)
            .await;
        parse_field(raw.as_deref())
    }
}
