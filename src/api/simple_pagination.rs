// src/api/simple_pagination.rs
//! Offset pagination over `start`/`limit` listings.

use super::types::{PaginatedResponse, PaginationResult};
use crate::error::AppError;
use std::time::Duration;

/// Fetches every page of a listing, pausing `delay` between requests.
///
/// `fetch_fn` receives the offset and page size. The run ends when the
/// server stops advertising a next page or returns an empty one.
pub async fn fetch_all_pages_simple<T, F, Fut>(
    mut fetch_fn: F,
    page_size: usize,
    delay: Duration,
) -> PaginationResult<T>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut start = 0usize;
    let mut pages_fetched = 0u32;

    loop {
        if pages_fetched > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = match fetch_fn(start, page_size).await {
            Ok(response) => response,
            Err(err) => {
                return PaginationResult {
                    items: all_items,
                    pages_fetched,
                    interrupted_by: Some(err),
                }
            }
        };

        let received = response.results.len();
        start = response.start + received;
        all_items.extend(response.results);
        pages_fetched += 1;

        log::debug!(
            "Fetched listing page {} ({} item(s), {} total)",
            pages_fetched,
            received,
            all_items.len()
        );

        if !response.has_more || received == 0 {
            break;
        }
    }

    PaginationResult {
        items: all_items,
        pages_fetched,
        interrupted_by: None,
    }
}
