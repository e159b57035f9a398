//! Chunked bulk write: persist an unbounded record sequence in batches the
//! backend can absorb.

use basecamp::{CallOptions, Error, Record, RecordStore, Result};

/// Saves `records` in successive chunks of at most `chunk_size`, returning
/// one result batch per chunk in chunk order.
///
/// Chunks are saved strictly sequentially: each chunk's save completes
/// before the next begins, bounding peak write load on the backend. A chunk
/// failure aborts the remaining chunks; chunks already saved stay saved.
pub async fn save_all_in_chunks(
    store: &dyn RecordStore,
    records: Vec<Record>,
    chunk_size: usize,
    options: &CallOptions,
) -> Result<Vec<Vec<Record>>> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfig(
            "chunk_size must be greater than 0".into(),
        ));
    }

    let total = records.len();
    let mut batches = Vec::with_capacity(total.div_ceil(chunk_size));
    for chunk in records.chunks(chunk_size) {
        let saved = store.save_batch(chunk.to_vec(), options).await?;
        diagnostics::log_debug!(
            "saved chunk {index} of {count} records",
            index: batches.len(),
            count: saved.len()
        );
        batches.push(saved);
    }

    diagnostics::log_info!(
        "saved {total} records in {chunks} chunks",
        total: total,
        chunks: batches.len()
    );
    Ok(batches)
}

/// [`save_all_in_chunks`] with the default chunk size.
pub async fn save_all(
    store: &dyn RecordStore,
    records: Vec<Record>,
    options: &CallOptions,
) -> Result<Vec<Vec<Record>>> {
    save_all_in_chunks(store, records, basecamp::DEFAULT_SAVE_CHUNK, options).await
}
