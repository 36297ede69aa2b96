//! Feed aggregation service.
//!
//! `get_feed_full_data` fans out every lookup that makes up a `Feed`:
//! 1. Provider addresses from the provider-list slots.
//! 2. Stake and proposed price per provider.
//! 3. Feed-level scalars: total stake, current price, configuration and the
//!    proposal/aggregation state.
//! 4. Price history and slashing events from transaction search.
//!
//! Individual lookups degrade to their empty value. Only a malformed provider
//! address aborts the aggregate.

use crate::error::FeedResult;
use eclipse_client::{ClientConfig, ExplorerClient, HistoryClient};
use eclipse_core::{Feed, FeedId, PricePoint, Provider, SlashedAddress};
use futures_util::future::try_join_all;
use tracing::{debug, info};

/// Provider-list slots probed per feed unless the caller asks otherwise.
pub const DEFAULT_MAX_PROVIDERS: usize = 8;

/// Service for retrieving complete feed data.
#[derive(Debug, Clone)]
pub struct FeedService {
    explorer: ExplorerClient,
    history: HistoryClient,
}

impl FeedService {
    /// Create a service from explicit clients.
    pub fn new(explorer: ExplorerClient, history: HistoryClient) -> Self {
        Self { explorer, history }
    }

    /// Create a service over HTTP from configuration.
    pub fn from_config(config: &ClientConfig) -> FeedResult<Self> {
        let explorer = ExplorerClient::new(config)?;
        let history = HistoryClient::with_transport(config, explorer.transport());
        Ok(Self::new(explorer, history))
    }

    /// Create a service around an existing explorer client.
    ///
    /// History queries share the explorer's transport and use `config` for
    /// the RPC endpoint and pagination.
    pub fn with_client(explorer: ExplorerClient, config: &ClientConfig) -> Self {
        let history = HistoryClient::with_transport(config, explorer.transport());
        Self::new(explorer, history)
    }

    pub fn explorer(&self) -> &ExplorerClient {
        &self.explorer
    }

    pub fn history(&self) -> &HistoryClient {
        &self.history
    }

    /// Complete snapshot of `feed_id`.
    ///
    /// `submitters[i]` combines the address, stake and proposed price of the
    /// i-th non-empty provider slot.
    ///
    /// # Errors
    /// Fails only if a provider slot holds an address that cannot be
    /// converted to a field.
    pub async fn get_feed_full_data(
        &self,
        feed_id: FeedId,
        name: Option<&str>,
        max_providers: usize,
    ) -> FeedResult<Feed> {
        let explorer = &self.explorer;

        let addresses = explorer.get_feed_providers(feed_id, max_providers).await;
        debug!(feed_id = %feed_id, providers = addresses.len(), "Provider slots resolved");

        let (
            stakes,
            proposed_prices,
            total_staked,
            current_price,
            infos,
            (
                provider_count,
                proposal_median,
                proposal_proposer,
                proposal_block,
                proposal_slashed,
                aggregate_done,
                slasher,
                slasher_reward,
                last_propose_block,
            ),
            price_history,
            slashed_addresses,
        ) = tokio::join!(
            try_join_all(
                addresses
                    .iter()
                    .map(|address| explorer.get_provider_stake(address, feed_id)),
            ),
            try_join_all(
                addresses
                    .iter()
                    .map(|address| explorer.get_provider_proposed_price(address, feed_id)),
            ),
            explorer.get_total_staked(feed_id),
            explorer.get_current_price(feed_id),
            explorer.get_feed_info(feed_id),
            async {
                tokio::join!(
                    explorer.get_provider_count(feed_id),
                    explorer.get_proposal_median(feed_id),
                    explorer.get_proposal_proposer(feed_id),
                    explorer.get_proposal_block(feed_id),
                    explorer.get_proposal_slashed(feed_id),
                    explorer.get_aggregate_done(feed_id),
                    explorer.get_slasher(feed_id),
                    explorer.get_slasher_reward(feed_id),
                    explorer.get_last_propose_block(feed_id),
                )
            },
            self.history.get_price_history(feed_id),
            self.history.get_slashed_addresses(feed_id),
        );

        let stakes = stakes?;
        let proposed_prices = proposed_prices?;

        let submitters: Vec<Provider> = addresses
            .into_iter()
            .zip(stakes)
            .zip(proposed_prices)
            .map(|((address, staked_credits), proposed_price)| Provider {
                address,
                staked_credits,
                proposed_price,
            })
            .collect();

        info!(
            feed_id = %feed_id,
            submitters = submitters.len(),
            history = price_history.len(),
            slashed = slashed_addresses.len(),
            "Feed data assembled"
        );

        Ok(Feed {
            id: feed_id,
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| Feed::default_name(feed_id)),
            infos,
            total_staked,
            submitters,
            price_history,
            slashed_addresses,
            current_price,
            provider_count,
            proposal_median,
            proposal_proposer,
            proposal_block,
            proposal_slashed,
            aggregate_done,
            slasher,
            slasher_reward,
            last_propose_block,
        })
    }

    /// Snapshot with the default name and provider limit.
    pub async fn get_feed(&self, feed_id: FeedId) -> FeedResult<Feed> {
        self.get_feed_full_data(feed_id, None, DEFAULT_MAX_PROVIDERS)
            .await
    }

    /// Accepted prices of `feed_id`, oldest first.
    pub async fn get_price_history(&self, feed_id: FeedId) -> Vec<PricePoint> {
        self.history.get_price_history(feed_id).await
    }

    /// Slashing events of `feed_id`, oldest first.
    pub async fn get_slashed_addresses(&self, feed_id: FeedId) -> Vec<SlashedAddress> {
        self.history.get_slashed_addresses(feed_id).await
    }
}
