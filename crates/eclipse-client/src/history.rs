//! Price history and slashing events from the transaction-search RPC.
//!
//! Uses `aleoTransactionsForProgram`:
//!
//! ```json
//! {"jsonrpc": "2.0", "id": 1, "method": "aleoTransactionsForProgram",
//!  "params": {"programId": "...", "functionName": "propose", "page": 0, "maxTransactions": 1000}}
//! ```
//!
//! Pages are fetched sequentially until a page comes back empty or shorter
//! than requested, or the configured page limit is reached.

use crate::config::{ClientConfig, HistoryConfig};
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpTransport, Transport};
use chrono::{DateTime, Utc};
use eclipse_core::{FeedId, Literal, Price, PricePoint, SlashKind, SlashedAddress, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// RPC method name.
pub const TRANSACTIONS_FOR_PROGRAM: &str = "aleoTransactionsForProgram";

/// Function that records price proposals.
pub const PROPOSE_FUNCTION: &str = "propose";

/// Request params for `aleoTransactionsForProgram`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionsForProgramParams<'a> {
    program_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_name: Option<&'a str>,
    page: u64,
    max_transactions: u32,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    /// Kept as raw values so one odd transaction does not sink the page.
    #[serde(default)]
    result: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// One transaction as returned by the search RPC.
///
/// Transitions may sit at `transaction.execution.transitions` or directly at
/// `execution.transitions`. The finalization time is read from the first
/// present of `finalizedAt`, `finalized_at`, `finalized`, `timestamp` and
/// `block_timestamp`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcTransaction {
    #[serde(default, rename = "finalizedAt")]
    pub finalized_at: Option<serde_json::Value>,
    #[serde(default, rename = "finalized_at")]
    pub finalized_at_snake: Option<serde_json::Value>,
    #[serde(default)]
    pub finalized: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub block_timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub transaction: Option<TransactionBody>,
    #[serde(default)]
    pub execution: Option<Execution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionBody {
    #[serde(default)]
    pub execution: Option<Execution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// A program call. Either spelling of the program and function keys is
/// accepted; the short one wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transition {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default, rename = "programId")]
    pub program_id: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default, rename = "functionName")]
    pub function_name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<TransitionInput>,
}

impl Transition {
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref().or(self.program_id.as_deref())
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref().or(self.function_name.as_deref())
    }
}

/// Transition input. `value` is any JSON; only string values (plaintext
/// literals) are interpreted, ciphertext objects are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl TransitionInput {
    fn literal(&self) -> Option<Literal> {
        self.value.as_ref()?.as_str().map(Literal::parse)
    }
}

impl RpcTransaction {
    fn transitions(&self) -> &[Transition] {
        self.transaction
            .as_ref()
            .and_then(|t| t.execution.as_ref())
            .or(self.execution.as_ref())
            .map(|e| e.transitions.as_slice())
            .unwrap_or_default()
    }

    /// Finalization time as a sortable string.
    ///
    /// Numeric values are unix seconds and are rendered as RFC 3339 UTC.
    pub fn timestamp(&self) -> Option<String> {
        let raw = [
            &self.finalized_at,
            &self.finalized_at_snake,
            &self.finalized,
            &self.timestamp,
            &self.block_timestamp,
        ]
        .into_iter()
        .find_map(Option::as_ref)?;

        match raw {
            serde_json::Value::String(s) => match s.parse::<i64>() {
                Ok(secs) => unix_to_rfc3339(secs),
                Err(_) => Some(s.clone()),
            },
            serde_json::Value::Number(n) => n.as_i64().and_then(unix_to_rfc3339),
            _ => None,
        }
    }
}

fn unix_to_rfc3339(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339())
}

/// Whether `input` carries `feed_id` as a field or unsigned literal.
fn is_feed_input(input: &TransitionInput, feed_id: FeedId) -> bool {
    match input.literal() {
        Some(Literal::Field(value)) => value == U256::from(feed_id.value()),
        Some(Literal::Unsigned { value, .. }) => value == u128::from(feed_id.value()),
        _ => false,
    }
}

fn transitions_for<'a>(
    tx: &'a RpcTransaction,
    program: &'a str,
    function: &'a str,
    feed_id: FeedId,
) -> impl Iterator<Item = &'a Transition> + 'a {
    tx.transitions().iter().filter(move |t| {
        t.program() == Some(program)
            && t.function() == Some(function)
            && t.inputs.iter().any(|i| is_feed_input(i, feed_id))
    })
}

/// Proposed price of a `propose` transition.
///
/// Prefers an input named `price`, otherwise the first `u128` literal.
fn proposed_price(transition: &Transition) -> Option<Price> {
    let by_name = transition
        .inputs
        .iter()
        .find(|i| i.name.as_deref() == Some("price"))
        .and_then(|i| i.literal())
        .and_then(|l| l.as_unsigned());

    let raw = by_name.or_else(|| {
        transition.inputs.iter().find_map(|i| match i.literal()? {
            Literal::Unsigned {
                value,
                width: eclipse_core::UintWidth::U128,
            } => Some(value),
            _ => None,
        })
    })?;

    Price::from_micro(raw)
}

/// First address literal among the transition inputs.
fn slashed_address(transition: &Transition) -> Option<String> {
    transition.inputs.iter().find_map(|i| match i.literal()? {
        Literal::Address(address) => Some(address),
        _ => None,
    })
}

/// Client for the transaction-search RPC.
#[derive(Clone)]
pub struct HistoryClient {
    transport: Arc<dyn Transport>,
    rpc_url: String,
    program: String,
    config: HistoryConfig,
}

impl std::fmt::Debug for HistoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryClient")
            .field("rpc_url", &self.rpc_url)
            .field("program", &self.program)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HistoryClient {
    /// Create a client over HTTP.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            rpc_url: config.rpc_url.clone(),
            program: config.programs.aggregate.clone(),
            config: config.history.clone(),
        }
    }

    /// Fetch one page of transactions for `function_name`.
    ///
    /// Returns the number of entries the RPC served alongside the ones that
    /// decoded; pagination is driven by the former.
    async fn fetch_page(
        &self,
        function_name: &str,
        page: u64,
    ) -> ClientResult<(usize, Vec<RpcTransaction>)> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: TRANSACTIONS_FOR_PROGRAM,
            params: TransactionsForProgramParams {
                program_id: &self.program,
                function_name: Some(function_name),
                page,
                max_transactions: self.config.effective_page_size(),
            },
        };
        let body = serde_json::to_value(&request)?;

        let response = self
            .transport
            .post_json(self.rpc_url.clone(), body)
            .await
            .ok_or_else(|| ClientError::Rpc("no response".to_string()))?;

        let response: RpcResponse = serde_json::from_value(response)?;
        if let Some(error) = response.error {
            return Err(ClientError::Rpc(error.to_string()));
        }

        let raw = response.result.unwrap_or_default();
        let served = raw.len();
        let transactions = raw
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<RpcTransaction>(raw) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    debug!(function_name, page, error = %e, "Skipping undecodable transaction");
                    None
                }
            })
            .collect();

        Ok((served, transactions))
    }

    /// All transactions for `function_name`, paging up to `max_pages`.
    ///
    /// A failed page ends pagination; what was gathered so far is returned.
    async fn fetch_all(&self, function_name: &str, max_pages: Option<u32>) -> Vec<RpcTransaction> {
        let page_size = self.config.effective_page_size() as usize;
        let mut all = Vec::new();
        let mut page = 0u64;

        loop {
            if max_pages.is_some_and(|max| page >= u64::from(max)) {
                debug!(function_name, page, "Page limit reached");
                break;
            }

            let (served, batch) = match self.fetch_page(function_name, page).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(function_name, page, error = %e, "Transaction search failed");
                    break;
                }
            };

            debug!(function_name, page, served, decoded = batch.len(), "Fetched transaction page");
            all.extend(batch);

            if served < page_size {
                break;
            }
            page += 1;
        }

        all
    }

    /// Accepted `propose` prices for `feed_id`, oldest first.
    pub async fn get_price_history(&self, feed_id: FeedId) -> Vec<PricePoint> {
        let transactions = self
            .fetch_all(PROPOSE_FUNCTION, self.config.price_max_pages)
            .await;
        let program = self.program.as_str();

        let mut points: Vec<PricePoint> = transactions
            .iter()
            .flat_map(|tx| {
                let timestamp = tx.timestamp();
                transitions_for(tx, program, PROPOSE_FUNCTION, feed_id).filter_map(
                    move |t| {
                        Some(PricePoint {
                            timestamp: timestamp.clone()?,
                            price: proposed_price(t)?,
                        })
                    },
                )
            })
            .collect();

        points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        info!(feed_id = %feed_id, points = points.len(), "Price history loaded");
        points
    }

    /// Slashing events for `feed_id` (aggregators and providers), oldest first.
    pub async fn get_slashed_addresses(&self, feed_id: FeedId) -> Vec<SlashedAddress> {
        let max_pages = self.config.slashing_max_pages;
        let (aggregators, providers) = tokio::join!(
            self.fetch_all(SlashKind::Aggregator.function_name(), max_pages),
            self.fetch_all(SlashKind::Provider.function_name(), max_pages),
        );
        let program = self.program.as_str();

        let mut events: Vec<SlashedAddress> = [
            (SlashKind::Aggregator, aggregators),
            (SlashKind::Provider, providers),
        ]
        .iter()
        .flat_map(|(kind, transactions)| {
            let kind = *kind;
            transactions.iter().flat_map(move |tx| {
                let date = tx.timestamp();
                transitions_for(tx, program, kind.function_name(), feed_id).filter_map(
                    move |t| {
                        Some(SlashedAddress {
                            address: slashed_address(t)?,
                            date: date.clone()?,
                            kind,
                        })
                    },
                )
            })
        })
        .collect();

        events.sort_by(|a, b| a.date.cmp(&b.date));
        info!(feed_id = %feed_id, events = events.len(), "Slashing events loaded");
        events
    }
}
