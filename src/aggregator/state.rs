use std::collections::HashSet;

use crate::types::TransactionRecord;

/// Mutable state of one aggregation run. Never shared between runs.
#[derive(Debug, Default)]
pub struct AggregationState {
    /// Ids already processed. Only grows.
    pub seen: HashSet<u64>,

    /// Number of accepted records.
    pub count: u64,

    /// Running sum, present only when the policy extracts amounts.
    pub total: Option<u64>,

    pub ordered: Vec<TransactionRecord>,

    /// Last seen id; `None` until the first page was consumed.
    pub cursor: Option<u64>,

    pub pages: usize,
    pub done: bool,
}
