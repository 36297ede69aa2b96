//! Transport trait for explorer and RPC requests.
//!
//! Clients talk to the network through `Transport` so that:
//! - service logic can be unit tested with `MockTransport`
//! - network failures are absorbed in one place
//!
//! Implementations never fail: any error or non-success status is logged
//! and reported as `None`.

use crate::error::{ClientError, ClientResult};
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::HashMap;
use std::pin::Pin;
use tracing::{debug, warn};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Request/response transport.
pub trait Transport: Send + Sync {
    /// GET `url`, returning the body text on a success status.
    fn get_text(&self, url: String) -> BoxFuture<'_, Option<String>>;

    /// POST `body` as JSON to `url`, returning the decoded JSON response.
    fn post_json(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> BoxFuture<'_, Option<serde_json::Value>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("eclipse-oracle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: String) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move {
            debug!(url = %url, "GET");

            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, error = %e, "Error fetching data");
                    return None;
                }
            };

            let status = response.status();
            if !status.is_success() {
                debug!(url = %url, %status, "Non-success status, treating as absent");
                return None;
            }

            match response.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to read response body");
                    None
                }
            }
        })
    }

    fn post_json(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> BoxFuture<'_, Option<serde_json::Value>> {
        Box::pin(async move {
            debug!(url = %url, "POST");

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, error = %e, "RPC request failed");
                    return None;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                warn!(url = %url, %status, body = %text, "RPC returned non-success status");
                return None;
            }

            match response.json().await {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to parse RPC response");
                    None
                }
            }
        })
    }
}

/// Recorded POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPost {
    pub url: String,
    pub body: serde_json::Value,
}

/// In-memory transport for tests.
///
/// GET responses are keyed by exact URL; unknown URLs behave like a 404.
/// RPC responses are keyed by `(functionName, page)` taken from the request
/// params; unknown keys answer with an empty `result`.
#[derive(Debug, Default)]
pub struct MockTransport {
    texts: Mutex<HashMap<String, String>>,
    rpc_pages: Mutex<HashMap<(String, u64), serde_json::Value>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<RecordedPost>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for GET `url`.
    pub fn set_text(&self, url: impl Into<String>, body: impl Into<String>) {
        self.texts.lock().insert(url.into(), body.into());
    }

    /// Serve `transactions` as the `result` of page `page` for `function_name`.
    pub fn set_rpc_page(&self, function_name: &str, page: u64, transactions: serde_json::Value) {
        self.rpc_pages.lock().insert(
            (function_name.to_string(), page),
            serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": transactions }),
        );
    }

    /// Serve a raw RPC response (e.g. a JSON-RPC error object).
    pub fn set_rpc_response(&self, function_name: &str, page: u64, response: serde_json::Value) {
        self.rpc_pages
            .lock()
            .insert((function_name.to_string(), page), response);
    }

    /// URLs requested with GET, in request order.
    pub fn get_requests(&self) -> Vec<String> {
        self.gets.lock().clone()
    }

    /// POST requests, in request order.
    pub fn post_requests(&self) -> Vec<RecordedPost> {
        self.posts.lock().clone()
    }
}

impl Transport for MockTransport {
    fn get_text(&self, url: String) -> BoxFuture<'_, Option<String>> {
        self.gets.lock().push(url.clone());
        let body = self.texts.lock().get(&url).cloned();
        Box::pin(async move { body })
    }

    fn post_json(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> BoxFuture<'_, Option<serde_json::Value>> {
        let params = &body["params"];
        let function = params["functionName"].as_str().unwrap_or_default().to_string();
        let page = params["page"].as_u64().unwrap_or_default();

        let response = self
            .rpc_pages
            .lock()
            .get(&(function, page))
            .cloned()
            .unwrap_or_else(|| serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": [] }));

        self.posts.lock().push(RecordedPost { url, body });
        Box::pin(async move { Some(response) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_get_known_and_unknown() {
        let mock = MockTransport::new();
        mock.set_text("http://x/a", "1u64");

        assert_eq!(mock.get_text("http://x/a".into()).await, Some("1u64".into()));
        assert_eq!(mock.get_text("http://x/b".into()).await, None);
        assert_eq!(mock.get_requests(), vec!["http://x/a", "http://x/b"]);
    }

    #[tokio::test]
    async fn test_mock_rpc_pages() {
        let mock = MockTransport::new();
        mock.set_rpc_page("propose", 0, serde_json::json!([{ "id": "tx" }]));

        let body = serde_json::json!({ "params": { "functionName": "propose", "page": 0 } });
        let response = mock.post_json("http://rpc".into(), body).await.unwrap();
        assert_eq!(response["result"][0]["id"], "tx");

        let body = serde_json::json!({ "params": { "functionName": "propose", "page": 1 } });
        let response = mock.post_json("http://rpc".into(), body).await.unwrap();
        assert_eq!(response["result"], serde_json::json!([]));
        assert_eq!(mock.post_requests().len(), 2);
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new().is_ok());
    }
}
