//! Blocking queries: re-run a read until the store moves past the caller's
//! last seen index or the wait limit runs out.

use std::time::{Duration, Instant};

use scout_core::{QueryOptions, SearchResponse, SearchResult};
use scout_store::{StateSnapshot, StateStore};
use tracing::debug;

/// Wait limit when the caller does not set one.
pub const DEFAULT_MAX_QUERY_TIME: Duration = Duration::from_secs(300);
/// Longest wait a caller may ask for.
pub const MAX_QUERY_TIME: Duration = Duration::from_secs(600);

pub fn max_wait(opts: &QueryOptions) -> Duration {
    match opts.max_query_time {
        Some(d) if !d.is_zero() => d.min(MAX_QUERY_TIME),
        _ => DEFAULT_MAX_QUERY_TIME,
    }
}

/// Run `query` against the current snapshot. With `min_query_index > 0` the
/// query is repeated on every index change until the response index exceeds
/// it; on timeout the last response is returned as is.
pub async fn blocking_query<F>(store: &StateStore, opts: &QueryOptions, mut query: F) -> SearchResult<SearchResponse>
where
    F: FnMut(&StateSnapshot) -> SearchResult<SearchResponse>,
{
    let mut rx = store.subscribe_index();
    let deadline = Instant::now() + max_wait(opts);
    let mut runs = 0u32;
    loop {
        // Mark the index seen before reading so a concurrent apply still wakes us.
        let _ = *rx.borrow_and_update();
        let snap = store.current();
        let mut resp = query(&*snap)?;
        runs += 1;
        resp.meta.known_leader = true;

        if opts.min_query_index == 0 || resp.meta.index > opts.min_query_index {
            return Ok(resp);
        }
        let now = Instant::now();
        if now >= deadline {
            debug!(runs, index = resp.meta.index, "api: blocking query timed out");
            return Ok(resp);
        }
        match tokio::time::timeout(deadline - now, rx.changed()).await {
            Ok(Ok(())) => continue,
            Ok(Err(_)) | Err(_) => {
                debug!(runs, index = resp.meta.index, "api: blocking query woke without change");
                return Ok(resp);
            }
        }
    }
}
