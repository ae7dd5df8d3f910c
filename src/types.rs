use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Decimal places of the native asset.
pub const XEM_DIVISIBILITY: u32 = 6;

/// Largest divisibility a mosaic definition may declare.
pub const MAX_DIVISIBILITY: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Transfer,
    /// Multisig wrapper whose inner transaction is a transfer.
    MultisigTransfer,
    Other,
}

/// Namespaced asset identifier, `namespace:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetId {
    pub namespace: String,
    pub name: String,
}

impl AssetId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().to_lowercase(),
            name: name.into().to_lowercase(),
        }
    }

    pub fn xem() -> Self {
        Self::new("nem", "xem")
    }

    pub fn is_xem(&self) -> bool {
        self.namespace == "nem" && self.name == "xem"
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::xem()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid asset id '{0}', expected namespace:name")]
pub struct AssetIdError(pub String);

impl FromStr for AssetId {
    type Err = AssetIdError;

    /// Namespaces may contain dots (`foo.bar:baz`), the name is after the last colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().rsplit_once(':') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() => Ok(Self::new(ns, name)),
            _ => Err(AssetIdError(s.to_string())),
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MosaicAmount {
    pub asset: AssetId,
    pub quantity: u64,
}

/// The effective transfer of a record. For multisig wrappers this is the
/// inner transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferBody {
    /// Micro-XEM, or the bundle multiplier when `mosaics` is non-empty.
    pub amount: u64,
    pub mosaics: Vec<MosaicAmount>,
}

/// One entry of an account's transaction history as returned by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub id: u64,
    pub hash: String,
    pub kind: TransactionKind,
    pub type_code: u32,
    pub timestamp: u32,
    pub height: u64,
    pub fee: u64,
    pub sender: String,
    pub recipient: Option<String>,
    pub transfer: Option<TransferBody>,
}

/// Which history endpoint of the node to page through.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    All,
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn path(self) -> &'static str {
        match self {
            Direction::All => "/account/transfers/all",
            Direction::Incoming => "/account/transfers/incoming",
            Direction::Outgoing => "/account/transfers/outgoing",
        }
    }
}
