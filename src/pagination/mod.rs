//! Pagination module
//!
//! Retrieves every page of the facility listing.
//!
//! # Overview
//!
//! Two strategies are tried in fixed priority order:
//!
//! 1. **Next link** - fetch the first Next.js data page, then follow each
//!    page's `next` locator.
//! 2. **Page number** - walk `?page=N` on the data route until the reported
//!    page count, an empty page, or a 404.
//!
//! The second strategy only runs when the first returns fewer records than
//! the fallback threshold, and its records then replace the first's.

mod fetcher;
mod strategies;
mod types;

pub use fetcher::{fetch_all, PaginatedFetcher};
pub use types::{
    FacilityEndpoints, FetchOptions, FetchOutcome, Locator, Page, StopReason, Strategy,
    StrategyRun, DEFAULT_BASE_URL, DEFAULT_FALLBACK_THRESHOLD, DEFAULT_LISTING_PATH,
};
