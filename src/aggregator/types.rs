use serde::Serialize;

use crate::types::{AssetId, Direction, TransactionKind, TransactionRecord};

/// Page size NIS uses for account history.
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy)]
pub enum Relevance {
    /// Every record counts.
    Any,
    /// Transfers, and multisig wrappers around a transfer.
    Transfers,
    Custom(fn(&TransactionRecord) -> bool),
}

impl Relevance {
    pub fn accepts(&self, record: &TransactionRecord) -> bool {
        match self {
            Relevance::Any => true,
            Relevance::Transfers => matches!(
                record.kind,
                TransactionKind::Transfer | TransactionKind::MultisigTransfer
            ),
            Relevance::Custom(f) => f(record),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrdering {
    /// Order the node returned them in (newest first).
    Insertion,
    ByTimestampDescending,
}

/// How an aggregation run filters, sums and stops.
#[derive(Debug, Clone)]
pub struct AggregationPolicy {
    pub relevance: Relevance,
    /// Asset whose quantity is summed into `total`. `None` disables summing.
    pub asset: Option<AssetId>,
    pub stop_on_short_page: bool,
    pub page_limit: Option<usize>,
    pub ordering: RecordOrdering,
    pub keep_records: bool,
    pub page_size: usize,
    pub direction: Direction,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            relevance: Relevance::Any,
            asset: None,
            stop_on_short_page: true,
            page_limit: None,
            ordering: RecordOrdering::Insertion,
            keep_records: false,
            page_size: DEFAULT_PAGE_SIZE,
            direction: Direction::All,
        }
    }
}

impl AggregationPolicy {
    /// Counts every transaction in the history.
    pub fn count() -> Self {
        Self::default()
    }

    /// Counts transfers and sums the quantity of `asset` they moved.
    pub fn count_with_amount(asset: AssetId) -> Self {
        Self {
            relevance: Relevance::Transfers,
            asset: Some(asset),
            ..Self::default()
        }
    }

    /// Lists the newest page only.
    pub fn recent() -> Self {
        Self {
            page_limit: Some(1),
            keep_records: true,
            ..Self::default()
        }
    }

    /// Lists the whole history, newest timestamp first.
    pub fn sorted_history() -> Self {
        Self {
            ordering: RecordOrdering::ByTimestampDescending,
            keep_records: true,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_relevance(mut self, relevance: Relevance) -> Self {
        self.relevance = relevance;
        self
    }
}

/// What the aggregator wants after consuming a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Fetch the next older page starting after `cursor`.
    Continue { cursor: Option<u64> },
    Done,
}

/// Final result of an aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub records: Vec<TransactionRecord>,
    pub pages_fetched: usize,
}
