//! Paginated fetcher
//!
//! Resolves the entry point, runs the primary strategy and falls back to the
//! secondary one when the primary comes up short.

use super::types::{FacilityEndpoints, FetchOptions, FetchOutcome, Page};
use crate::discovery::discover_build_id;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonValue, Record};
use tracing::{error, info};

/// Fetches every page of the facility listing
#[derive(Debug)]
pub struct PaginatedFetcher<'a> {
    client: &'a HttpClient,
    endpoints: FacilityEndpoints,
    options: FetchOptions,
}

impl<'a> PaginatedFetcher<'a> {
    /// Create a fetcher over a caller-owned session
    pub fn new(client: &'a HttpClient, endpoints: FacilityEndpoints, options: FetchOptions) -> Self {
        Self {
            client,
            endpoints,
            options,
        }
    }

    /// Endpoints this fetcher reads from
    pub fn endpoints(&self) -> &FacilityEndpoints {
        &self.endpoints
    }

    /// Fetch options
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Discover the build id and fetch every record.
    ///
    /// Never fails: an unresolvable entry point or failing pages produce an
    /// empty or partial result. Callers decide whether empty is fatal.
    pub async fn fetch_all(&self) -> Vec<Record> {
        let page_url = self.endpoints.public_page_url();
        let Some(build_id) = discover_build_id(self.client, &page_url, self.options.timeout).await
        else {
            error!("Could not determine Next.js build ID. Cannot proceed.");
            return Vec::new();
        };

        self.fetch_with_build_id(&build_id).await.into_records()
    }

    /// Run the primary strategy and, below the threshold, the fallback.
    ///
    /// Once the fallback runs its records replace the primary's, even when it
    /// returns fewer.
    pub async fn fetch_with_build_id(&self, build_id: &str) -> FetchOutcome {
        info!("Attempting to fetch facilities via Next.js + API pagination...");
        let primary = self.fetch_via_next_links(build_id).await;

        if primary.records.len() >= self.options.fallback_threshold {
            return FetchOutcome::Primary(primary.records);
        }

        info!(
            "Primary strategy returned {} records (threshold {}), trying page iteration...",
            primary.records.len(),
            self.options.fallback_threshold
        );
        let fallback = self.fetch_via_page_numbers(build_id).await;
        FetchOutcome::Fallback(fallback.records)
    }

    /// Fetch one page. `page` adds `?page=N` when greater than one.
    pub(crate) async fn fetch_page(&self, url: &str, page: Option<u32>) -> Result<Option<Page>> {
        let mut request = RequestConfig::new().timeout(self.options.timeout);
        if let Some(page) = page.filter(|p| *p > 1) {
            request = request.query("page", page.to_string());
        }

        let body: JsonValue = self.client.get_json_with_config(url, request).await?;
        Page::decode(body)
    }

    pub(crate) async fn pause(&self) {
        if !self.options.sleep.is_zero() {
            tokio::time::sleep(self.options.sleep).await;
        }
    }
}

/// Fetch every facility record from `endpoints` using `client`.
///
/// Convenience wrapper around [`PaginatedFetcher::fetch_all`].
pub async fn fetch_all(
    client: &HttpClient,
    endpoints: FacilityEndpoints,
    options: FetchOptions,
) -> Vec<Record> {
    PaginatedFetcher::new(client, endpoints, options)
        .fetch_all()
        .await
}
