//! Bounded-round deletion: remove every matching record, one backend-sized
//! batch at a time, until the filter matches nothing.

use basecamp::{CallOptions, Error, RecordQuery, RecordStore, Result};

/// Deletes every record matching `query` in rounds of at most `page_size`.
///
/// Each round re-issues the same bounded window at skip 0: deleting records
/// shifts the remaining matches into the window, so no skip arithmetic is
/// needed. The loop converges when a round fetches nothing or deletes
/// nothing. Rounds are strictly sequential; a failed fetch or delete aborts
/// the call with whatever progress prior rounds already made.
///
/// Returns the total number of records deleted.
pub async fn delete_all(
    query: &dyn RecordQuery,
    store: &dyn RecordStore,
    page_size: u64,
    options: &CallOptions,
) -> Result<u64> {
    if page_size == 0 {
        return Err(Error::InvalidConfig(
            "page_size must be greater than 0".into(),
        ));
    }

    let class = query.class_name();
    let mut total = 0u64;
    let mut rounds = 0u64;
    loop {
        let batch = query.find_page(0, page_size, options).await?;
        if batch.is_empty() {
            break;
        }
        let deleted = store.delete_batch(&batch, options).await?;
        rounds += 1;
        total += deleted;
        diagnostics::log_debug!(
            "delete_all on {class}: round {round} removed {deleted} records",
            class: class,
            round: rounds,
            deleted: deleted
        );
        if deleted == 0 {
            break;
        }
    }

    diagnostics::log_info!(
        "delete_all on {class} removed {total} records in {rounds} rounds",
        class: class,
        total: total,
        rounds: rounds
    );
    Ok(total)
}

/// [`delete_all`] with the backend's default page ceiling.
pub async fn delete_all_default(
    query: &dyn RecordQuery,
    store: &dyn RecordStore,
    options: &CallOptions,
) -> Result<u64> {
    delete_all(query, store, basecamp::DEFAULT_PAGE_SIZE, options).await
}
