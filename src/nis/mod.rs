pub mod api;
pub mod client;
pub mod error;
pub mod mock_client;
pub mod models;

pub use api::NisApi;
pub use client::NisClient;
pub use error::{AssetLookupError, RemoteError};
pub use mock_client::MockNisClient;
