use crate::aggregator::state::AggregationState;
use crate::aggregator::types::{AggregationPolicy, PageOutcome, RecordOrdering};
use crate::types::{AssetId, TransactionRecord};

/// Scale of the `amount` field when it acts as a mosaic bundle multiplier.
const MULTIPLIER_SCALE: u128 = 1_000_000;

pub fn on_page(
    state: &mut AggregationState,
    policy: &AggregationPolicy,
    page: Vec<TransactionRecord>,
) -> PageOutcome {
    if state.done {
        log::warn!("[AGGREGATOR] page received after completion, ignoring");
        return PageOutcome::Done;
    }

    state.pages += 1;
    let page_len = page.len();
    let mut caught_up = false;

    for record in page {
        if !state.seen.insert(record.id) {
            log::debug!("[AGGREGATOR] id {} already seen, caught up", record.id);
            caught_up = true;
            break;
        }
        state.cursor = Some(record.id);

        if !policy.relevance.accepts(&record) {
            log::trace!("[AGGREGATOR] skipping {:?} record {}", record.kind, record.id);
            continue;
        }

        state.count += 1;

        if let (Some(asset), Some(total)) = (policy.asset.as_ref(), state.total.as_mut()) {
            *total = total.saturating_add(extract_amount(&record, asset));
        }

        if policy.keep_records {
            state.ordered.push(record);
        }
    }

    log::debug!(
        "[AGGREGATOR] page #{}: {} records, count now {}",
        state.pages,
        page_len,
        state.count
    );

    let short_page = page_len < policy.page_size;
    let limit_reached = policy.page_limit.is_some_and(|limit| state.pages >= limit);

    if caught_up || page_len == 0 || (policy.stop_on_short_page && short_page) || limit_reached {
        state.done = true;
        PageOutcome::Done
    } else {
        PageOutcome::Continue { cursor: state.cursor }
    }
}

/// Quantity of `asset` moved by a record, in the asset's smallest unit.
///
/// Bundle transfers scale each mosaic quantity by `amount / 10^6`. Plain
/// transfers only ever move XEM. Records without a transfer body move nothing.
pub fn extract_amount(record: &TransactionRecord, asset: &AssetId) -> u64 {
    let Some(transfer) = record.transfer.as_ref() else {
        return 0;
    };

    if !transfer.mosaics.is_empty() {
        return transfer
            .mosaics
            .iter()
            .find(|m| m.asset == *asset)
            .map(|m| {
                let scaled = transfer.amount as u128 * m.quantity as u128 / MULTIPLIER_SCALE;
                u64::try_from(scaled).unwrap_or(u64::MAX)
            })
            .unwrap_or(0);
    }

    if asset.is_xem() {
        transfer.amount
    } else {
        0
    }
}

pub fn finish_ordering(state: &mut AggregationState, ordering: RecordOrdering) {
    if ordering == RecordOrdering::ByTimestampDescending {
        state.ordered.sort_by_key(|r| r.timestamp);
        state.ordered.reverse();
    }
}
