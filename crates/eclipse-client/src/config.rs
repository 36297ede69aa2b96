//! Client configuration.
//!
//! Every client is built from an explicit `ClientConfig`; there are no
//! process-wide defaults beyond the `Default` impls below.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Explorer REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.explorer.provable.com/v1";

/// JSON-RPC endpoint used for transaction search.
pub const DEFAULT_RPC_URL: &str = "https://testnet.aleorpc.com";

/// Largest page the transaction-search RPC serves.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Aleo network segment of explorer URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-chain program ids of the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramIds {
    /// Provider list, stakes, totals and provider count.
    pub staking: String,
    /// Per-provider proposed prices.
    pub submit: String,
    /// Aggregation and proposal state; also emits `propose` and `slash_*`.
    pub aggregate: String,
    /// Feed configuration.
    pub feed: String,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            staking: "eclipse_oracle_staking_2.aleo".to_string(),
            submit: "eclipse_oracle_submit_2.aleo".to_string(),
            aggregate: "eclipse_oracle_aggregate_2.aleo".to_string(),
            feed: "eclipse_oracle_feed.aleo".to_string(),
        }
    }
}

/// Transaction-search pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Transactions requested per page. Clamped to `1..=MAX_PAGE_SIZE`.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Page limit for price history. `None` pages until a short page.
    #[serde(default)]
    pub price_max_pages: Option<u32>,
    /// Page limit for slashing events.
    #[serde(default = "default_slashing_max_pages")]
    pub slashing_max_pages: Option<u32>,
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_slashing_max_pages() -> Option<u32> {
    Some(1)
}

impl HistoryConfig {
    /// Page size actually sent to the RPC.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            price_max_pages: None,
            slashing_max_pages: default_slashing_max_pages(),
        }
    }
}

/// Configuration shared by the explorer and history clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub network: Network,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default)]
    pub programs: ProgramIds,
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            network: Network::default(),
            rpc_url: default_rpc_url(),
            programs: ProgramIds::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.history.page_size, 1000);
        assert_eq!(config.history.slashing_max_pages, Some(1));
        assert_eq!(config.history.price_max_pages, None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            network = "mainnet"

            [programs]
            feed = "my_feed.aleo"
            "#,
        )
        .unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.programs.feed, "my_feed.aleo");
        assert_eq!(config.programs.staking, "eclipse_oracle_staking_2.aleo");
    }

    #[test]
    fn test_page_size_clamped() {
        let history = HistoryConfig {
            page_size: 5000,
            ..HistoryConfig::default()
        };
        assert_eq!(history.effective_page_size(), MAX_PAGE_SIZE);
        let history = HistoryConfig {
            page_size: 0,
            ..HistoryConfig::default()
        };
        assert_eq!(history.effective_page_size(), 1);
    }
}
