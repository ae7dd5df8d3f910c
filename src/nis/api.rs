use crate::nis::error::RemoteError;
use crate::nis::models::{AccountInfo, BlockInfo, MosaicDefinition};
use crate::types::{Direction, MosaicAmount, TransactionRecord};

/// Node queries used by the runner and the commands.
///
/// Implementations must not retry on their own: a failed request is reported
/// as is, and the caller decides what it means for its run.
#[allow(async_fn_in_trait)]
pub trait NisApi {
    /// One page of an account's history, newest first.
    ///
    /// `cursor` is the id of the oldest record of the previous page; the node
    /// returns records strictly older than it. `None` requests the newest page.
    async fn fetch_transactions(
        &self,
        address: &str,
        direction: Direction,
        cursor: Option<u64>,
    ) -> Result<Vec<TransactionRecord>, RemoteError>;

    async fn fetch_owned_mosaics(&self, address: &str) -> Result<Vec<MosaicAmount>, RemoteError>;

    /// Mosaic definitions created under `namespace`.
    async fn fetch_mosaic_definitions(
        &self,
        namespace: &str,
    ) -> Result<Vec<MosaicDefinition>, RemoteError>;

    async fn fetch_account(&self, address: &str) -> Result<AccountInfo, RemoteError>;

    async fn chain_height(&self) -> Result<u64, RemoteError>;

    async fn block_at(&self, height: u64) -> Result<BlockInfo, RemoteError>;
}
