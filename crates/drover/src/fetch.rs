//! Unbounded paged retrieval: fetch every matching record past the
//! backend's per-call ceiling.

use basecamp::{CallOptions, Error, Record, RecordQuery, Result};
use futures::future::try_join_all;

/// Fetches every record matching `query`, issuing one bounded page request
/// per `page_size` window.
///
/// All page requests are issued concurrently and joined; results are
/// flattened in page order regardless of completion order. A single failing
/// page fails the whole call with no partial result.
pub async fn find_all(
    query: &dyn RecordQuery,
    page_size: u64,
    options: &CallOptions,
) -> Result<Vec<Record>> {
    if page_size == 0 {
        return Err(Error::InvalidConfig(
            "page_size must be greater than 0".into(),
        ));
    }

    let total = query.count(options).await?;
    if total == 0 {
        return Ok(Vec::new());
    }

    let pages = total.div_ceil(page_size);
    let class = query.class_name();
    diagnostics::log_debug!(
        "find_all on {class}: {total} records over {pages} pages",
        class: class,
        total: total,
        pages: pages
    );

    let page_results = try_join_all(
        (0..pages).map(|page| query.find_page(page * page_size, page_size, options)),
    )
    .await?;

    let records: Vec<Record> = page_results.into_iter().flatten().collect();
    diagnostics::log_info!(
        "find_all on {class} returned {count} records",
        class: class,
        count: records.len()
    );
    Ok(records)
}

/// [`find_all`] with the backend's default page ceiling.
pub async fn find_all_default(
    query: &dyn RecordQuery,
    options: &CallOptions,
) -> Result<Vec<Record>> {
    find_all(query, basecamp::DEFAULT_PAGE_SIZE, options).await
}
