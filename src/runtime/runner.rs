use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::aggregator::{Aggregate, AggregationPolicy, PageOutcome, TransactionAggregator};
use crate::nis::api::NisApi;
use crate::nis::error::RemoteError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("aggregation cancelled")]
    Cancelled,
}

/// **AggregationRunner**
///
/// Imperative shell around [`TransactionAggregator`]:
/// 1. asks the client for a page,
/// 2. feeds it to the aggregator,
/// 3. repeats with the cursor the aggregator hands back until it is done.
///
/// Requests are strictly sequential. Every [`run`](Self::run) builds its own
/// aggregator, so runs for different addresses share nothing but the client.
pub struct AggregationRunner<C> {
    client: C,
    cancel: CancellationToken,
}

impl<C: NisApi> AggregationRunner<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned token, e.g. one cancelled on Ctrl-C.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Pages through the history of `address` until the policy says stop.
    ///
    /// The first remote error aborts the run and no partial aggregate is
    /// returned. Cancellation is observed before each request and while one
    /// is in flight.
    pub async fn run(
        &self,
        address: &str,
        policy: AggregationPolicy,
    ) -> Result<Aggregate, AggregateError> {
        let t0 = Instant::now();
        let direction = policy.direction;
        let mut aggregator = TransactionAggregator::new(policy);
        let mut cursor = None;

        log::info!("[RUNNER] aggregating history of {} ({:?})", address, direction);

        loop {
            if self.cancel.is_cancelled() {
                log::info!("[RUNNER] cancelled before requesting cursor {:?}", cursor);
                return Err(AggregateError::Cancelled);
            }

            log::debug!("[RUNNER] requesting page, cursor {:?}", cursor);

            let page = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    log::info!("[RUNNER] cancelled while waiting for cursor {:?}", cursor);
                    return Err(AggregateError::Cancelled);
                }
                page = self.client.fetch_transactions(address, direction, cursor) => page,
            };

            let page = page.map_err(|e| {
                log::error!("[RUNNER] page request failed, aborting: {}", e);
                AggregateError::Remote(e)
            })?;

            match aggregator.handle_page(page) {
                PageOutcome::Continue { cursor: next } => cursor = next,
                PageOutcome::Done => break,
            }
        }

        let aggregate = aggregator.finish();

        log::info!(
            "[RUNNER] done in {:?}: {} pages, count {}",
            t0.elapsed(),
            aggregate.pages_fetched,
            aggregate.count
        );

        Ok(aggregate)
    }
}
