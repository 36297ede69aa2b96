//! Integration tests for FeedService over an in-memory transport.
//!
//! Mapping URLs are built the same way the explorer client builds them, so
//! these tests exercise the full path: slot probing, composite keys, value
//! parsing, history search and aggregation.

use eclipse_client::{provider_feed_key, ClientConfig, ExplorerClient, MockTransport};
use eclipse_core::{FeedId, Price, SlashKind};
use eclipse_feed::{FeedError, FeedService, DEFAULT_MAX_PROVIDERS};
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;

const BASE: &str = "https://api.explorer.provable.com/v1/testnet";
const STAKING: &str = "eclipse_oracle_staking_2.aleo";
const SUBMIT: &str = "eclipse_oracle_submit_2.aleo";
const AGGREGATE: &str = "eclipse_oracle_aggregate_2.aleo";
const FEED: &str = "eclipse_oracle_feed.aleo";

const ADDR_1: &str = "aleo1y5crk3j3t3nhylvgjw02nd9let27p6lkqcg3cfej84y9xhnfwsqqvrtn60";
const ADDR_2: &str = "aleo1ff2kq6mksxxf0g4dhrpuak0yalaq59fq9vmyznzhvfkh3quwnyqq9rm79n";
const ADDR_3: &str = "aleo1daagtyym56cme37jmh50xqcwryjz7wj92pdkvutus7ffm29nhcqq4x9ztg";

fn url(program: &str, mapping: &str, key: &str) -> String {
    format!("{BASE}/program/{program}/mapping/{mapping}/{key}")
}

fn service() -> (FeedService, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let config = ClientConfig::default();
    let explorer = ExplorerClient::with_transport(&config, mock.clone());
    (FeedService::with_client(explorer, &config), mock)
}

/// Only the feed configuration exists; everything else is absent.
#[tokio::test]
async fn test_config_only_feed() {
    let (service, mock) = service();
    mock.set_text(
        url(FEED, "feeds", "3field"),
        format!("owner: {ADDR_1}, paused: true"),
    );

    let feed = service.get_feed("3".parse().unwrap()).await.unwrap();

    assert_eq!(feed.id, FeedId(3));
    assert!(feed.infos.as_ref().unwrap().paused);
    assert_eq!(feed.total_staked, 0);
    assert!(feed.submitters.is_empty());
    assert_eq!(feed.current_price, None);
    assert!(feed.price_history.is_empty());
    assert!(feed.slashed_addresses.is_empty());
    assert_eq!(feed.provider_count, None);
    assert_eq!(feed.proposal_slashed, None);
}

/// Stakes and prices line up with the slot order, with gaps removed.
#[tokio::test]
async fn test_submitters_are_slot_aligned() {
    let (service, mock) = service();
    let feed_id = FeedId(10);

    // Slots 10, 12 and 13 are filled; 11 is empty.
    mock.set_text(url(STAKING, "provider_list", "10field"), ADDR_1);
    mock.set_text(url(STAKING, "provider_list", "12field"), ADDR_2);
    mock.set_text(url(STAKING, "provider_list", "13field"), ADDR_3);

    for (address, stake) in [(ADDR_1, 100u128), (ADDR_2, 200), (ADDR_3, 300)] {
        let key = provider_feed_key(address, feed_id).unwrap();
        mock.set_text(url(STAKING, "stakes", &key), format!("{stake}u128"));
    }
    // Only the second provider has a pending proposal.
    let key = provider_feed_key(ADDR_2, feed_id).unwrap();
    mock.set_text(url(SUBMIT, "temp_price", &key), "1050000u128");

    let feed = service
        .get_feed_full_data(feed_id, Some("ALEO/USD"), 4)
        .await
        .unwrap();

    assert_eq!(feed.name, "ALEO/USD");
    assert_eq!(feed.submitters.len(), 3);

    let addresses: Vec<&str> = feed.submitters.iter().map(|p| p.address.as_str()).collect();
    assert_eq!(addresses, vec![ADDR_1, ADDR_2, ADDR_3]);

    let stakes: Vec<u128> = feed.submitters.iter().map(|p| p.staked_credits).collect();
    assert_eq!(stakes, vec![100, 200, 300]);

    assert_eq!(feed.submitters[0].proposed_price, None);
    assert_eq!(
        feed.submitters[1].proposed_price,
        Some(Price::new(dec!(1.05)))
    );
    assert_eq!(feed.submitters[2].proposed_price, None);
}

/// Provider list length never exceeds the probe limit.
#[tokio::test]
async fn test_provider_limit() {
    let (service, mock) = service();
    for slot in 0..DEFAULT_MAX_PROVIDERS as u64 + 2 {
        mock.set_text(url(STAKING, "provider_list", &format!("{slot}field")), ADDR_1);
    }

    let feed = service.get_feed_full_data(FeedId(0), None, 2).await.unwrap();
    assert_eq!(feed.submitters.len(), 2);

    let feed = service.get_feed(FeedId(0)).await.unwrap();
    assert_eq!(feed.submitters.len(), DEFAULT_MAX_PROVIDERS);
}

/// A malformed address in a provider slot aborts the aggregate.
#[tokio::test]
async fn test_malformed_provider_address_fails() {
    let (service, mock) = service();
    // 63 lowercase alphanumerics, but not a valid bech32m string.
    let bogus = format!("aleo1{}", "b".repeat(58));
    mock.set_text(url(STAKING, "provider_list", "3field"), bogus);

    let err = service.get_feed(FeedId(3)).await.unwrap_err();
    assert!(matches!(err, FeedError::Client(_)));
}

/// Feed-level scalars and history land in the right fields.
#[tokio::test]
async fn test_full_feed() {
    let (service, mock) = service();
    let id = FeedId(3);

    mock.set_text(url(STAKING, "total_staked", "3field"), "600u128");
    mock.set_text(url(STAKING, "provider_count", "3field"), "3u8");
    mock.set_text(url(AGGREGATE, "latest_price", "3field"), "1035000u128");
    mock.set_text(url(AGGREGATE, "proposal_median", "3field"), "1040000u128");
    mock.set_text(url(AGGREGATE, "proposal_proposer", "3field"), ADDR_2);
    mock.set_text(url(AGGREGATE, "proposal_block", "3field"), "9001u32");
    mock.set_text(url(AGGREGATE, "proposal_slashed", "3field"), "false");
    mock.set_text(url(AGGREGATE, "aggregate_done", "3field"), "true");
    mock.set_text(url(AGGREGATE, "slasher", "3field"), ADDR_3);
    mock.set_text(url(AGGREGATE, "slasher_reward", "3field"), "25u64");
    mock.set_text(url(AGGREGATE, "last_propose_block", "3field"), "8999u32");

    mock.set_rpc_page(
        "propose",
        0,
        json!([
            {
                "finalizedAt": 1_717_236_600,
                "transaction": { "execution": { "transitions": [{
                    "program": AGGREGATE, "function": "propose",
                    "inputs": [{ "name": "feed_id", "value": "3field" },
                               { "name": "price", "value": "1040000u128" }]
                }]}}
            },
            {
                "finalizedAt": 1_717_236_000,
                "transaction": { "execution": { "transitions": [{
                    "program": AGGREGATE, "function": "propose",
                    "inputs": [{ "name": "feed_id", "value": "3field" },
                               { "name": "price", "value": "1030000u128" }]
                }]}}
            }
        ]),
    );
    mock.set_rpc_page(
        "slash_provider",
        0,
        json!([{
            "finalizedAt": 1_717_000_000,
            "transaction": { "execution": { "transitions": [{
                "program": AGGREGATE, "function": "slash_provider",
                "inputs": [{ "name": "feed_id", "value": "3field" },
                           { "name": "provider", "value": ADDR_1 }]
            }]}}
        }]),
    );

    let feed = service.get_feed(id).await.unwrap();

    assert_eq!(feed.total_staked, 600);
    assert_eq!(feed.provider_count, Some(3));
    assert_eq!(feed.current_price, Some(Price::new(dec!(1.035))));
    assert_eq!(feed.proposal_median, Some(Price::new(dec!(1.04))));
    assert_eq!(feed.proposal_proposer.as_deref(), Some(ADDR_2));
    assert_eq!(feed.proposal_block, Some(9001));
    assert_eq!(feed.proposal_slashed, Some(false));
    assert_eq!(feed.aggregate_done, Some(true));
    assert_eq!(feed.slasher.as_deref(), Some(ADDR_3));
    assert_eq!(feed.slasher_reward, Some(25));
    assert_eq!(feed.last_propose_block, Some(8999));
    assert!(feed.infos.is_none());

    assert_eq!(feed.price_history.len(), 2);
    assert_eq!(feed.price_history[0].price, Price::new(dec!(1.03)));
    assert!(feed
        .price_history
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));

    assert_eq!(feed.slashed_addresses.len(), 1);
    assert_eq!(feed.slashed_addresses[0].address, ADDR_1);
    assert_eq!(feed.slashed_addresses[0].kind, SlashKind::Provider);

    // Direct history accessors agree with the aggregate.
    assert_eq!(service.get_price_history(id).await, feed.price_history);
    assert_eq!(service.get_slashed_addresses(id).await, feed.slashed_addresses);
}
