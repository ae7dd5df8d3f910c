//! Wire shapes of the NIS JSON API and their conversion into crate types.

use serde::{Deserialize, Serialize};

use crate::types::{AssetId, MosaicAmount, TransactionKind, TransactionRecord, TransferBody};

pub const TRANSFER_TYPE: u32 = 0x0101;
pub const MULTISIG_TYPE: u32 = 0x1004;

/// Every list endpoint wraps its items in `{ "data": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// `{ "data": "..." }`, or `{}` when there is no hash.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HashData {
    #[serde(default)]
    pub data: Option<String>,
}

impl HashData {
    fn non_empty(&self) -> Option<&str> {
        self.data.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicIdDto {
    pub namespace_id: String,
    pub name: String,
}

impl From<&MosaicIdDto> for AssetId {
    fn from(id: &MosaicIdDto) -> Self {
        AssetId::new(id.namespace_id.as_str(), id.name.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicDto {
    pub mosaic_id: MosaicIdDto,
    pub quantity: u64,
}

impl From<MosaicDto> for MosaicAmount {
    fn from(m: MosaicDto) -> Self {
        MosaicAmount {
            asset: AssetId::from(&m.mosaic_id),
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetaDto {
    pub id: u64,
    #[serde(default)]
    pub hash: HashData,
    #[serde(default)]
    pub inner_hash: HashData,
    #[serde(default)]
    pub height: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    #[serde(rename = "type")]
    pub tx_type: u32,
    #[serde(default)]
    pub time_stamp: u32,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub signer: String,
    pub recipient: Option<String>,
    pub amount: Option<u64>,
    #[serde(default)]
    pub mosaics: Vec<MosaicDto>,
    pub other_trans: Option<Box<TransactionDto>>,
}

impl TransactionDto {
    fn transfer_body(&self) -> Option<TransferBody> {
        if self.tx_type != TRANSFER_TYPE {
            return None;
        }

        Some(TransferBody {
            amount: self.amount.unwrap_or(0),
            mosaics: self.mosaics.iter().cloned().map(MosaicAmount::from).collect(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionMetaDataPair {
    pub meta: TransactionMetaDto,
    pub transaction: TransactionDto,
}

impl From<TransactionMetaDataPair> for TransactionRecord {
    fn from(pair: TransactionMetaDataPair) -> Self {
        let TransactionMetaDataPair { meta, transaction } = pair;

        let inner = match transaction.tx_type {
            MULTISIG_TYPE => transaction.other_trans.as_deref(),
            _ => Some(&transaction),
        };

        let transfer = inner.and_then(TransactionDto::transfer_body);

        let kind = match (transaction.tx_type, transfer.is_some()) {
            (TRANSFER_TYPE, _) => TransactionKind::Transfer,
            (MULTISIG_TYPE, true) => TransactionKind::MultisigTransfer,
            _ => TransactionKind::Other,
        };

        let hash = meta
            .inner_hash
            .non_empty()
            .or_else(|| meta.hash.non_empty())
            .unwrap_or_default()
            .to_string();

        TransactionRecord {
            id: meta.id,
            hash,
            kind,
            type_code: transaction.tx_type,
            timestamp: transaction.time_stamp,
            height: meta.height,
            fee: transaction.fee,
            sender: transaction.signer.clone(),
            recipient: inner.and_then(|t| t.recipient.clone()),
            transfer,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropertyDto {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicDefinitionDto {
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub description: String,
    pub id: MosaicIdDto,
    #[serde(default)]
    pub properties: Vec<PropertyDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MosaicDefinitionMetaDataPair {
    pub mosaic: MosaicDefinitionDto,
}

/// Definition of a mosaic, reduced to what display needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MosaicDefinition {
    pub asset: AssetId,
    pub creator: String,
    pub description: String,
    /// `None` when the definition carries no parsable divisibility property.
    pub divisibility: Option<u32>,
}

impl From<MosaicDefinitionMetaDataPair> for MosaicDefinition {
    fn from(pair: MosaicDefinitionMetaDataPair) -> Self {
        let def = pair.mosaic;
        let divisibility = def
            .properties
            .iter()
            .find(|p| p.name == "divisibility")
            .and_then(|p| p.value.parse().ok());

        MosaicDefinition {
            asset: AssetId::from(&def.id),
            creator: def.creator,
            description: def.description,
            divisibility,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub address: String,
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub vested_balance: u64,
    #[serde(default)]
    pub importance: f64,
    #[serde(default)]
    pub harvested_blocks: u64,
    pub public_key: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetaDto {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub remote_status: String,
    #[serde(default)]
    pub cosignatories: Vec<AccountDto>,
    #[serde(default)]
    pub cosignatory_of: Vec<AccountDto>,
}

/// `/account/get` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountInfo {
    pub account: AccountDto,
    #[serde(default)]
    pub meta: AccountMetaDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainHeightDto {
    pub height: u64,
}

/// `/block/at/public` response, without the transaction bodies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub height: u64,
    pub time_stamp: u32,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub signer: String,
    #[serde(default)]
    pub prev_block_hash: HashData,
    #[serde(default, serialize_with = "serialize_len")]
    pub transactions: Vec<serde_json::Value>,
}

impl BlockInfo {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_len<S: serde::Serializer>(v: &Vec<serde_json::Value>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(v.len() as u64)
}

/// Error body NIS sends with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct NisErrorDto {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}
