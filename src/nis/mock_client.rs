use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::nis::api::NisApi;
use crate::nis::error::RemoteError;
use crate::nis::models::{
    AccountDto, AccountInfo, AccountMetaDto, BlockInfo, HashData, MosaicDefinition,
    MULTISIG_TYPE, TRANSFER_TYPE,
};
use crate::types::{
    AssetId, Direction, MosaicAmount, TransactionKind, TransactionRecord, TransferBody,
};

/// Pure in-memory NIS for tests.
///
/// History pages are handed out in the order they were pushed, regardless of
/// the cursor; every request is recorded so tests can check the paging.
#[derive(Default)]
pub struct MockNisClient {
    pages: Mutex<VecDeque<Result<Vec<TransactionRecord>, RemoteError>>>,
    requests: Mutex<Vec<(Direction, Option<u64>)>>,
    owned: Mutex<Option<Result<Vec<MosaicAmount>, RemoteError>>>,
    definitions: HashMap<String, Result<Vec<MosaicDefinition>, RemoteError>>,
    definition_lookups: Mutex<Vec<String>>,
    height: u64,
}

impl MockNisClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&mut self, page: Vec<TransactionRecord>) {
        self.pages.get_mut().unwrap_or_else(|e| e.into_inner()).push_back(Ok(page));
    }

    pub fn push_error(&mut self, err: RemoteError) {
        self.pages.get_mut().unwrap_or_else(|e| e.into_inner()).push_back(Err(err));
    }

    pub fn set_owned(&mut self, owned: Result<Vec<MosaicAmount>, RemoteError>) {
        *self.owned.get_mut().unwrap_or_else(|e| e.into_inner()) = Some(owned);
    }

    pub fn set_definitions(
        &mut self,
        namespace: &str,
        defs: Result<Vec<MosaicDefinition>, RemoteError>,
    ) {
        self.definitions.insert(namespace.to_string(), defs);
    }

    pub fn set_height(&mut self, height: u64) {
        self.height = height;
    }

    /// `(direction, cursor)` of every history request so far.
    pub fn requests(&self) -> Vec<(Direction, Option<u64>)> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn definition_lookups(&self) -> Vec<String> {
        self.definition_lookups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl NisApi for MockNisClient {
    async fn fetch_transactions(
        &self,
        _address: &str,
        direction: Direction,
        cursor: Option<u64>,
    ) -> Result<Vec<TransactionRecord>, RemoteError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((direction, cursor));

        self.pages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn fetch_owned_mosaics(&self, _address: &str) -> Result<Vec<MosaicAmount>, RemoteError> {
        self.owned
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn fetch_mosaic_definitions(
        &self,
        namespace: &str,
    ) -> Result<Vec<MosaicDefinition>, RemoteError> {
        self.definition_lookups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(namespace.to_string());

        self.definitions
            .get(namespace)
            .cloned()
            .unwrap_or_else(|| Ok(vec![]))
    }

    async fn fetch_account(&self, address: &str) -> Result<AccountInfo, RemoteError> {
        Ok(AccountInfo {
            account: AccountDto {
                address: address.to_string(),
                ..AccountDto::default()
            },
            meta: AccountMetaDto::default(),
        })
    }

    async fn chain_height(&self) -> Result<u64, RemoteError> {
        Ok(self.height)
    }

    async fn block_at(&self, height: u64) -> Result<BlockInfo, RemoteError> {
        if height > self.height {
            return Err(RemoteError::Status {
                status: 404,
                message: format!("block {} not found", height),
            });
        }

        Ok(BlockInfo {
            height,
            time_stamp: 0,
            signature: String::new(),
            signer: String::new(),
            prev_block_hash: HashData::default(),
            transactions: vec![],
        })
    }
}

// =====================================================================
// Record fixtures
// =====================================================================

fn record(id: u64, kind: TransactionKind, type_code: u32, transfer: Option<TransferBody>) -> TransactionRecord {
    TransactionRecord {
        id,
        hash: format!("{:064x}", id),
        kind,
        type_code,
        timestamp: id as u32,
        height: id,
        fee: 50_000,
        sender: String::from("signer"),
        recipient: transfer.as_ref().map(|_| String::from("TDWZ55R5VIHSH5WWK6CEGAIP7D35XVFZ3RU2S5UQ")),
        transfer,
    }
}

/// Plain XEM transfer of `amount` micro-XEM.
pub fn transfer(id: u64, amount: u64) -> TransactionRecord {
    record(
        id,
        TransactionKind::Transfer,
        TRANSFER_TYPE,
        Some(TransferBody { amount, mosaics: vec![] }),
    )
}

/// Multisig wrapper around a plain XEM transfer.
pub fn multisig_transfer(id: u64, amount: u64) -> TransactionRecord {
    record(
        id,
        TransactionKind::MultisigTransfer,
        MULTISIG_TYPE,
        Some(TransferBody { amount, mosaics: vec![] }),
    )
}

/// Transfer carrying a mosaic bundle; `amount` is the multiplier field.
pub fn mosaic_transfer(id: u64, amount: u64, mosaics: Vec<MosaicAmount>) -> TransactionRecord {
    record(
        id,
        TransactionKind::Transfer,
        TRANSFER_TYPE,
        Some(TransferBody { amount, mosaics }),
    )
}

/// Importance transfer, not a transfer of value.
pub fn other_record(id: u64) -> TransactionRecord {
    record(id, TransactionKind::Other, 0x0801, None)
}

pub fn definition(asset: AssetId, divisibility: Option<u32>) -> MosaicDefinition {
    MosaicDefinition {
        asset,
        creator: String::from("creator"),
        description: String::new(),
        divisibility,
    }
}
