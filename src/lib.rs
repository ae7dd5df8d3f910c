pub mod aggregator;
pub mod balances;
pub mod display;
pub mod network;
pub mod nis;
pub mod runtime;
pub mod time;
pub mod types;

pub use aggregator::{Aggregate, AggregationPolicy, TransactionAggregator};
pub use network::{Address, Network, NodeEndpoint};
pub use nis::{NisApi, NisClient, RemoteError};
pub use runtime::{AggregateError, AggregationRunner};
pub use types::{AssetId, Direction, TransactionKind, TransactionRecord};
