//! Network clients for the Eclipse oracle on Aleo.
//!
//! - `ExplorerClient`: program mapping lookups over the explorer REST API
//! - `HistoryClient`: price history and slashing events via transaction search
//! - `Transport`: request seam with an HTTP implementation and an in-memory mock

pub mod config;
pub mod error;
pub mod explorer;
pub mod history;
pub mod transport;

pub use config::{ClientConfig, HistoryConfig, Network, ProgramIds, DEFAULT_BASE_URL, DEFAULT_RPC_URL};
pub use error::{ClientError, ClientResult};
pub use explorer::{provider_feed_key, ExplorerClient};
pub use history::{HistoryClient, RpcTransaction};
pub use transport::{BoxFuture, HttpTransport, MockTransport, RecordedPost, Transport};
