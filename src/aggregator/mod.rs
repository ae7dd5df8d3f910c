//! Transaction history aggregation.
//!
//! The aggregator is a pure state machine: it is fed one page of an
//! account's history at a time and answers whether another page is needed.
//! It never touches the network, which lives in [`crate::runtime`].
//!
//! # Stop conditions
//! * a record id that was already seen shows up again,
//! * a page is shorter than the page size (or empty),
//! * the policy's page limit is reached.

mod logic;
pub mod state;
pub mod types;


pub use logic::extract_amount;
pub use types::{
    Aggregate, AggregationPolicy, PageOutcome, RecordOrdering, Relevance, DEFAULT_PAGE_SIZE,
};

use crate::types::TransactionRecord;

use state::AggregationState;

#[derive(Debug)]
pub struct TransactionAggregator {
    policy: AggregationPolicy,
    state: AggregationState,
}

impl TransactionAggregator {
    pub fn new(policy: AggregationPolicy) -> Self {
        let state = AggregationState {
            total: policy.asset.as_ref().map(|_| 0),
            ..AggregationState::default()
        };

        Self { policy, state }
    }

    /// Cursor to request the next page with. `None` before the first page.
    pub fn cursor(&self) -> Option<u64> {
        self.state.cursor
    }

    pub fn is_done(&self) -> bool {
        self.state.done
    }

    /// Consumes a page, newest record first.
    pub fn handle_page(&mut self, page: Vec<TransactionRecord>) -> PageOutcome {
        logic::on_page(&mut self.state, &self.policy, page)
    }

    pub fn finish(mut self) -> Aggregate {
        logic::finish_ordering(&mut self.state, self.policy.ordering);

        Aggregate {
            count: self.state.count,
            total: self.state.total,
            records: self.state.ordered,
            pages_fetched: self.state.pages,
        }
    }
}
