//! Command-line surface and command execution.

use crate::config::AppConfig;
use crate::error::AppResult;
use clap::{Parser, Subcommand};
use eclipse_client::Network;
use eclipse_core::{convert_address_to_field, FeedId};
use eclipse_feed::FeedService;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct AddressFieldOutput<'a> {
    address: &'a str,
    field: String,
}

/// Eclipse oracle feed reader
#[derive(Parser, Debug)]
#[command(name = "eclipse-oracle", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (can also be set via ECLIPSE_CONFIG env var)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Network override (testnet or mainnet)
    #[arg(long, global = true, value_parser = parse_network)]
    pub network: Option<Network>,

    /// Explorer base URL override
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Transaction-search RPC URL override
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(network) = self.network {
            config.client.network = network;
        }
        if let Some(base_url) = &self.base_url {
            config.client.base_url = base_url.clone();
        }
        if let Some(rpc_url) = &self.rpc_url {
            config.client.rpc_url = rpc_url.clone();
        }
    }
}

fn parse_network(s: &str) -> Result<Network, String> {
    match s.to_ascii_lowercase().as_str() {
        "testnet" => Ok(Network::Testnet),
        "mainnet" => Ok(Network::Mainnet),
        other => Err(format!("unknown network '{other}' (expected testnet or mainnet)")),
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Full snapshot of a feed
    Feed {
        /// Feed id, with or without the `field` suffix
        id: FeedId,
        /// Display name (defaults to the configured name, then "Feed <id>")
        #[arg(long)]
        name: Option<String>,
        /// Provider-list slots to probe
        #[arg(long)]
        max_providers: Option<usize>,
    },
    /// Accepted price proposals, oldest first
    History { id: FeedId },
    /// Slashed aggregators and providers, oldest first
    Slashed { id: FeedId },
    /// Field element of an Aleo address
    AddressField { address: String },
}

/// Run `command` and return its output as pretty-printed JSON.
pub async fn execute(
    command: &Command,
    config: &AppConfig,
    service: &FeedService,
) -> AppResult<String> {
    debug!(?command, "Executing command");

    let output = match command {
        Command::Feed {
            id,
            name,
            max_providers,
        } => {
            let name = name.as_deref().or_else(|| config.feed.name_for(*id));
            let max_providers = max_providers.unwrap_or(config.feed.max_providers);
            let feed = service.get_feed_full_data(*id, name, max_providers).await?;
            serde_json::to_string_pretty(&feed)?
        }
        Command::History { id } => {
            serde_json::to_string_pretty(&service.get_price_history(*id).await)?
        }
        Command::Slashed { id } => {
            serde_json::to_string_pretty(&service.get_slashed_addresses(*id).await)?
        }
        Command::AddressField { address } => {
            let field = convert_address_to_field(address)?;
            serde_json::to_string_pretty(&AddressFieldOutput {
                address,
                field: format!("{field}field"),
            })?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use eclipse_client::{ClientConfig, ExplorerClient, MockTransport};
    use serde_json::{json, Value};
    use std::sync::Arc;

    const ADDR_1: &str = "aleo1y5crk3j3t3nhylvgjw02nd9let27p6lkqcg3cfej84y9xhnfwsqqvrtn60";
    const FEEDS_URL: &str =
        "https://api.explorer.provable.com/v1/testnet/program/eclipse_oracle_feed.aleo/mapping/feeds/3field";

    fn service(config: &AppConfig) -> (FeedService, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let explorer = ExplorerClient::with_transport(&config.client, mock.clone());
        (FeedService::with_client(explorer, &config.client), mock)
    }

    #[test]
    fn test_parse_feed_command() {
        let cli = Cli::try_parse_from([
            "eclipse-oracle",
            "feed",
            "3field",
            "--name",
            "ALEO/USD",
            "--max-providers",
            "4",
            "--network",
            "mainnet",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Feed {
                id: FeedId(3),
                name: Some("ALEO/USD".to_string()),
                max_providers: Some(4),
            }
        );
        assert_eq!(cli.network, Some(Network::Mainnet));
    }

    #[test]
    fn test_parse_rejects_bad_feed_id() {
        assert!(Cli::try_parse_from(["eclipse-oracle", "history", "abc"]).is_err());
        assert!(Cli::try_parse_from(["eclipse-oracle", "feed", "3", "--network", "devnet"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::try_parse_from([
            "eclipse-oracle",
            "--rpc-url",
            "http://localhost:9000",
            "slashed",
            "3",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.client.rpc_url, "http://localhost:9000");
        assert_eq!(config.client, ClientConfig::default().with_rpc_url("http://localhost:9000"));
    }

    #[tokio::test]
    async fn test_feed_command_output() {
        let mut config = AppConfig::default();
        config
            .feed
            .names
            .insert("3".to_string(), "ALEO/USD".to_string());
        let (service, mock) = service(&config);
        mock.set_text(FEEDS_URL, format!("owner: {ADDR_1}, paused: true"));

        let command = Command::Feed {
            id: FeedId(3),
            name: None,
            max_providers: None,
        };
        let output = execute(&command, &config, &service).await.unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(output["id"], 3);
        assert_eq!(output["name"], "ALEO/USD");
        assert_eq!(output["totalStaked"], 0);
        assert_eq!(output["submitters"], json!([]));
        assert_eq!(output["currentPrice"], Value::Null);
        assert_eq!(output["infos"]["paused"], true);
    }

    #[tokio::test]
    async fn test_history_command_empty() {
        let config = AppConfig::default();
        let (service, _mock) = service(&config);

        let output = execute(&Command::History { id: FeedId(3) }, &config, &service)
            .await
            .unwrap();
        assert_eq!(output, "[]");
    }

    #[tokio::test]
    async fn test_address_field_command() {
        let config = AppConfig::default();
        let (service, _mock) = service(&config);

        let command = Command::AddressField {
            address: ADDR_1.to_string(),
        };
        let output = execute(&command, &config, &service).await.unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            output["field"],
            "205681485886329932146264085908605241700225703104743299085218373812832907301field"
        );

        let command = Command::AddressField {
            address: "btc1qqqsyqcyq5rqwzqfpg9scrgwpugpzysnzs23v9ccrydpk8qarc0sgnvrfe".to_string(),
        };
        let err = execute(&command, &config, &service).await.unwrap_err();
        assert!(matches!(err, AppError::Address(_)));
    }
}
