use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::aggregator::AggregationPolicy;
use crate::nis::api::NisApi;
use crate::nis::error::RemoteError;
use crate::nis::mock_client::{multisig_transfer, other_record, transfer, MockNisClient};
use crate::nis::models::{AccountInfo, BlockInfo, MosaicDefinition};
use crate::runtime::{AggregateError, AggregationRunner};
use crate::types::{AssetId, Direction, MosaicAmount, TransactionRecord};

const ADDR: &str = "TDWZ55R5VIHSH5WWK6CEGAIP7D35XVFZ3RU2S5UQ";

// --- Helpers ---

fn page(ids: impl IntoIterator<Item = u64>) -> Vec<TransactionRecord> {
    ids.into_iter().map(|id| transfer(id, 1_000_000)).collect()
}

/// Splits `n` records with ids `n..=1` into node-sized pages.
fn history(n: u64) -> Vec<Vec<TransactionRecord>> {
    let all = page((1..=n).rev());
    all.chunks(25).map(|c| c.to_vec()).collect()
}

// --- Mocks ---

/// Cancels the run's token from inside the client.
///
/// `after_pages`: cancel once that many pages have been served.
/// `stall_at`: cancel when that request starts, then never answer it.
struct CancellingApi {
    inner: MockNisClient,
    token: CancellationToken,
    after_pages: Option<usize>,
    stall_at: Option<usize>,
}

impl NisApi for CancellingApi {
    async fn fetch_transactions(
        &self,
        address: &str,
        direction: Direction,
        cursor: Option<u64>,
    ) -> Result<Vec<TransactionRecord>, RemoteError> {
        if self.stall_at == Some(self.inner.fetch_count()) {
            self.token.cancel();
            std::future::pending::<()>().await;
        }

        let page = self.inner.fetch_transactions(address, direction, cursor).await;
        if self.after_pages == Some(self.inner.fetch_count()) {
            self.token.cancel();
        }
        page
    }

    async fn fetch_owned_mosaics(&self, address: &str) -> Result<Vec<MosaicAmount>, RemoteError> {
        self.inner.fetch_owned_mosaics(address).await
    }

    async fn fetch_mosaic_definitions(
        &self,
        namespace: &str,
    ) -> Result<Vec<MosaicDefinition>, RemoteError> {
        self.inner.fetch_mosaic_definitions(namespace).await
    }

    async fn fetch_account(&self, address: &str) -> Result<AccountInfo, RemoteError> {
        self.inner.fetch_account(address).await
    }

    async fn chain_height(&self) -> Result<u64, RemoteError> {
        self.inner.chain_height().await
    }

    async fn block_at(&self, height: u64) -> Result<BlockInfo, RemoteError> {
        self.inner.block_at(height).await
    }
}

fn cancelling_runner(
    after_pages: Option<usize>,
    stall_at: Option<usize>,
) -> AggregationRunner<CancellingApi> {
    let mut inner = MockNisClient::new();
    inner.push_page(page((81..=105).rev()));
    inner.push_page(page([80]));

    let token = CancellationToken::new();
    let api = CancellingApi {
        inner,
        token: token.clone(),
        after_pages,
        stall_at,
    };

    AggregationRunner::new(api).with_cancellation(token)
}

// --- Tests ---

#[tokio::test]
async fn end_to_end_two_pages() {
    let mut api = MockNisClient::new();
    api.push_page(page((81..=105).rev()));
    api.push_page(page([80]));

    let runner = AggregationRunner::new(api);
    let out = runner
        .run(ADDR, AggregationPolicy::count_with_amount(AssetId::xem()))
        .await
        .unwrap();

    assert_eq!(runner.client().fetch_count(), 2);
    assert_eq!(out.count, 26);
    assert_eq!(out.total, Some(26_000_000));
    assert_eq!(
        runner.client().requests(),
        vec![(Direction::All, None), (Direction::All, Some(81))]
    );
}

#[tokio::test]
async fn short_page_needs_one_fetch() {
    let mut api = MockNisClient::new();
    api.push_page(page((1..=24).rev()));

    let runner = AggregationRunner::new(api);
    let out = runner.run(ADDR, AggregationPolicy::count()).await.unwrap();

    assert_eq!(runner.client().fetch_count(), 1);
    assert_eq!(out.count, 24);
}

#[tokio::test]
async fn empty_history_needs_one_fetch() {
    let runner = AggregationRunner::new(MockNisClient::new());
    let out = runner.run(ADDR, AggregationPolicy::count()).await.unwrap();

    assert_eq!(runner.client().fetch_count(), 1);
    assert_eq!(out.count, 0);
}

#[tokio::test]
async fn boundary_page_triggers_extra_fetch() {
    let mut api = MockNisClient::new();
    api.push_page(page((1..=25).rev()));
    api.push_page(vec![]);

    let runner = AggregationRunner::new(api);
    let out = runner.run(ADDR, AggregationPolicy::count()).await.unwrap();

    assert_eq!(runner.client().fetch_count(), 2);
    assert_eq!(out.count, 25);
}

#[tokio::test]
async fn fetches_are_bounded_by_history_size() {
    for n in [0u64, 1, 24, 25, 26, 50, 73, 100] {
        let mut api = MockNisClient::new();
        for p in history(n) {
            api.push_page(p);
        }

        let runner = AggregationRunner::new(api);
        let out = runner.run(ADDR, AggregationPolicy::count()).await.unwrap();

        let bound = (n as usize).div_ceil(25) + 1;
        assert!(
            runner.client().fetch_count() <= bound,
            "n = {}: {} fetches, bound {}",
            n,
            runner.client().fetch_count(),
            bound
        );
        assert_eq!(out.count, n);
    }
}

#[tokio::test]
async fn overlapping_pages_are_not_double_counted() {
    let mut api = MockNisClient::new();
    api.push_page(page((26..=50).rev()));
    // node repeats the tail of the previous page
    let mut second = page([27, 26]);
    second.extend(page((1..=23).rev()));
    api.push_page(second);

    let runner = AggregationRunner::new(api);
    let out = runner.run(ADDR, AggregationPolicy::count()).await.unwrap();

    assert_eq!(out.count, 25);
    assert_eq!(runner.client().fetch_count(), 2);
}

#[tokio::test]
async fn relevance_over_mixed_pages() {
    let mut api = MockNisClient::new();
    api.push_page(vec![
        transfer(4, 1_000_000),
        other_record(3),
        multisig_transfer(2, 2_000_000),
        other_record(1),
    ]);

    let runner = AggregationRunner::new(api);
    let out = runner
        .run(ADDR, AggregationPolicy::count_with_amount(AssetId::xem()))
        .await
        .unwrap();

    assert_eq!(out.count, 2);
    assert_eq!(out.total, Some(3_000_000));
}

#[tokio::test]
async fn remote_error_aborts_without_partial_result() {
    let mut api = MockNisClient::new();
    api.push_page(page((1..=25).rev()));
    api.push_error(RemoteError::Request("connection reset".into()));

    let runner = AggregationRunner::new(api);
    let err = runner.run(ADDR, AggregationPolicy::count()).await.unwrap_err();

    assert_eq!(
        err,
        AggregateError::Remote(RemoteError::Request("connection reset".into()))
    );
    assert_eq!(runner.client().fetch_count(), 2, "no retry after the failure");
}

#[tokio::test]
async fn cancelled_runner_never_fetches() {
    let mut api = MockNisClient::new();
    api.push_page(page([1]));

    let runner = AggregationRunner::new(api);
    runner.cancellation_token().cancel();

    let err = runner.run(ADDR, AggregationPolicy::count()).await.unwrap_err();

    assert_eq!(err, AggregateError::Cancelled);
    assert_eq!(runner.client().fetch_count(), 0);
}

#[tokio::test]
async fn cancel_between_pages_discards_progress() {
    let runner = cancelling_runner(Some(1), None);

    let err = runner
        .run(ADDR, AggregationPolicy::count_with_amount(AssetId::xem()))
        .await
        .unwrap_err();

    assert_eq!(err, AggregateError::Cancelled);
    assert_eq!(runner.client().inner.fetch_count(), 1);
}

#[tokio::test]
async fn cancel_interrupts_pending_request() {
    let runner = cancelling_runner(None, Some(1));

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        runner.run(ADDR, AggregationPolicy::count()),
    )
    .await
    .expect("runner must not wait on a cancelled request");

    assert_eq!(result.unwrap_err(), AggregateError::Cancelled);
    // the stalled second request never reached the node
    assert_eq!(runner.client().inner.fetch_count(), 1);
}

#[tokio::test]
async fn recent_reads_a_single_page() {
    let mut api = MockNisClient::new();
    for p in history(60) {
        api.push_page(p);
    }

    let runner = AggregationRunner::new(api);
    let out = runner.run(ADDR, AggregationPolicy::recent()).await.unwrap();

    assert_eq!(runner.client().fetch_count(), 1);
    assert_eq!(out.records.len(), 25);
    assert_eq!(out.records.first().map(|r| r.id), Some(60));
}

#[tokio::test]
async fn independent_runs_do_not_share_state() {
    let mut a = MockNisClient::new();
    a.push_page(page((1..=3).rev()));
    let mut b = MockNisClient::new();
    // same ids on another account must still be counted there
    b.push_page(page((1..=5).rev()));

    let ra = AggregationRunner::new(a);
    let rb = AggregationRunner::new(b);

    let (oa, ob) = tokio::join!(
        ra.run(ADDR, AggregationPolicy::count()),
        rb.run(ADDR, AggregationPolicy::count().with_direction(Direction::Outgoing)),
    );

    assert_eq!(oa.unwrap().count, 3);
    assert_eq!(ob.unwrap().count, 5);
    assert_eq!(rb.client().requests(), vec![(Direction::Outgoing, None)]);
}
