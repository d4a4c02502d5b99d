//! Traversal strategy implementations
//!
//! Both strategies are partial-failure tolerant: a failed request ends the
//! run but keeps every record collected before it.

use super::fetcher::PaginatedFetcher;
use super::types::{Locator, StopReason, Strategy, StrategyRun};
use tracing::{error, info, warn};

impl PaginatedFetcher<'_> {
    // ========================================================================
    // Next Link (primary)
    // ========================================================================

    /// Fetch the first data page for `build_id`, then follow each page's
    /// `next` locator until none remains, a fetch fails, or the cap is hit.
    pub async fn fetch_via_next_links(&self, build_id: &str) -> StrategyRun {
        let mut run = StrategyRun::new(Strategy::NextLink);
        let data_url = self.endpoints().data_url(build_id);

        info!("Fetching initial page data from: {data_url}");
        let first = match self.fetch_page(&data_url, None).await {
            Ok(Some(page)) => page,
            Ok(None) => {
                error!("Failed to fetch initial page data: response carried no data");
                return run.stopped(StopReason::NoData);
            }
            Err(e) => {
                error!("Failed to fetch initial page data: {e}");
                let stop = if e.is_not_found() {
                    StopReason::NotFound
                } else {
                    StopReason::FetchFailed
                };
                return run.stopped(stop);
            }
        };

        let api_total = first.reported_total();
        let mut next = first.next_locator().cloned();
        let fetched = first.results.len();
        run.push_page(first.results);
        info!(
            "Page 1: fetched {fetched} records (total so far: {}, API total: {api_total})",
            run.records.len()
        );

        while let Some(locator) = next.take() {
            if self.options().cap_reached(run.pages_fetched) {
                info!("Reached page cap of {} pages", run.pages_fetched);
                return run.stopped(StopReason::PageCap);
            }

            self.pause().await;

            let page_number = run.pages_fetched + 1;
            info!("Fetching page {page_number}...");

            let result = match &locator {
                Locator::Url(url) => self.fetch_page(url, None).await,
                Locator::Index(index) => self.fetch_page(&data_url, Some(*index)).await,
            };

            let page = match result {
                Ok(Some(page)) => page,
                Ok(None) => {
                    warn!("Failed to fetch page {page_number}, stopping pagination: no data");
                    return run.stopped(StopReason::NoData);
                }
                Err(e) => {
                    warn!("Failed to fetch page {page_number}, stopping pagination: {e}");
                    return run.stopped(StopReason::FetchFailed);
                }
            };

            next = page.next_locator().cloned();
            let fetched = page.results.len();
            run.push_page(page.results);
            info!(
                "Page {page_number}: fetched {fetched} records (total so far: {}, API total: {api_total})",
                run.records.len()
            );
        }

        run
    }

    // ========================================================================
    // Page Number (secondary)
    // ========================================================================

    /// Walk the data route page by page (`?page=N` for N > 1).
    ///
    /// The total page count is read once from the first page and reused.
    /// A 404 means the build id went stale and is not retried.
    pub async fn fetch_via_page_numbers(&self, build_id: &str) -> StrategyRun {
        let mut run = StrategyRun::new(Strategy::PageNumber);
        let data_url = self.endpoints().data_url(build_id);

        let mut page_number: u32 = 1;
        let mut total_pages: Option<u32> = None;

        loop {
            if self.options().cap_reached(run.pages_fetched) {
                info!("Reached page cap of {} pages", run.pages_fetched);
                return run.stopped(StopReason::PageCap);
            }

            if page_number > 1 {
                self.pause().await;
            }

            info!("Fetching page {page_number}...");
            let page = match self.fetch_page(&data_url, Some(page_number)).await {
                Ok(Some(page)) => page,
                Ok(None) => {
                    warn!("No data in page {page_number} response");
                    return run.stopped(StopReason::NoData);
                }
                Err(e) if e.is_not_found() => {
                    warn!("Got 404, build ID may have changed");
                    return run.stopped(StopReason::NotFound);
                }
                Err(e) => {
                    error!("Error on page {page_number}: {e}");
                    return run.stopped(StopReason::FetchFailed);
                }
            };

            let total = *total_pages.get_or_insert_with(|| {
                let total = page.total_pages.unwrap_or(1);
                info!(
                    "Total pages: {total}, Total records: {}",
                    page.reported_total()
                );
                total
            });

            if page.results.is_empty() {
                info!("No more results at page {page_number}");
                return run.stopped(StopReason::EmptyPage);
            }

            let fetched = page.results.len();
            run.push_page(page.results);
            info!(
                "Page {page_number}/{total}: fetched {fetched} records (total so far: {})",
                run.records.len()
            );

            if page_number >= total {
                return run.stopped(StopReason::Exhausted);
            }

            page_number += 1;
        }
    }
}
