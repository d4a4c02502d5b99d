//! Pagination types
//!
//! Page shapes, fetch options and the outcome types shared by both
//! traversal strategies.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::warn;

/// Primary results below this count trigger the page-number fallback
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 100;

/// Default KMHFL site
pub const DEFAULT_BASE_URL: &str = "https://kmhfl.health.go.ke";

/// Default public listing path (both the markup page and the data route)
pub const DEFAULT_LISTING_PATH: &str = "public/facilities";

// ============================================================================
// Page
// ============================================================================

/// Pointer to the next page: an absolute URL or a page number on the data route
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    /// Absolute URL of the next page
    Url(String),
    /// Page number on the data route
    Index(u32),
}

/// One page of a paginated listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    /// Records on this page. Entries that are not objects are dropped.
    #[serde(default, deserialize_with = "object_records")]
    pub results: Vec<Record>,
    /// Total record count reported by the API
    #[serde(default)]
    pub count: Option<u64>,
    /// Locator of the next page, if any
    #[serde(default)]
    pub next: Option<Locator>,
    /// Total page count reported by the API
    #[serde(default)]
    pub total_pages: Option<u32>,
}

fn object_records<'de, D>(deserializer: D) -> std::result::Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<JsonValue>>::deserialize(deserializer)?.unwrap_or_default();
    let total = values.len();
    let records: Vec<Record> = values
        .into_iter()
        .filter_map(|value| match value {
            JsonValue::Object(record) => Some(record),
            _ => None,
        })
        .collect();

    if records.len() < total {
        warn!(
            "Skipped {} non-object entries in page results",
            total - records.len()
        );
    }
    Ok(records)
}

impl Page {
    /// Parse a raw API page body
    pub fn from_value(body: JsonValue) -> Result<Self> {
        if !body.is_object() {
            return Err(Error::decode("page body is not a JSON object"));
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Parse a Next.js data envelope (`pageProps.data`).
    ///
    /// Returns `Ok(None)` when the envelope carries no data (missing, null or
    /// an empty object).
    pub fn from_envelope(mut body: JsonValue) -> Result<Option<Self>> {
        let data = body
            .get_mut("pageProps")
            .and_then(|props| props.get_mut("data"))
            .map(JsonValue::take);

        match data {
            Some(JsonValue::Object(map)) if !map.is_empty() => {
                Ok(Some(serde_json::from_value(JsonValue::Object(map))?))
            }
            Some(JsonValue::Object(_) | JsonValue::Null) | None => Ok(None),
            Some(other) => Err(Error::decode(format!(
                "pageProps.data is not an object: {other}"
            ))),
        }
    }

    /// Parse either a data envelope or a raw API page, whichever `body` is.
    ///
    /// Empty objects decode to `Ok(None)`.
    pub fn decode(body: JsonValue) -> Result<Option<Self>> {
        if body.get("pageProps").is_some() {
            return Self::from_envelope(body);
        }
        match body.as_object() {
            Some(map) if map.is_empty() => Ok(None),
            _ => Self::from_value(body).map(Some),
        }
    }

    /// Next locator, ignoring empty URLs
    pub fn next_locator(&self) -> Option<&Locator> {
        self.next.as_ref().filter(|locator| match locator {
            Locator::Url(url) => !url.is_empty(),
            Locator::Index(_) => true,
        })
    }

    /// Total reported by the API (0 when absent)
    pub fn reported_total(&self) -> u64 {
        self.count.unwrap_or(0)
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Locations of the public listing page and its Next.js data route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityEndpoints {
    /// Site root, without trailing slash
    pub base_url: String,
    /// Listing path relative to the site root
    pub listing_path: String,
}

impl Default for FacilityEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_LISTING_PATH)
    }
}

impl FacilityEndpoints {
    /// Create endpoints for a site and listing path
    pub fn new(base_url: impl Into<String>, listing_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            listing_path: listing_path.into().trim_matches('/').to_string(),
        }
    }

    /// Public HTML page that embeds the build id
    pub fn public_page_url(&self) -> String {
        format!("{}/{}", self.base_url, self.listing_path)
    }

    /// Server-side data route for a build id
    pub fn data_url(&self, build_id: &str) -> String {
        format!(
            "{}/_next/data/{}/{}.json",
            self.base_url, build_id, self.listing_path
        )
    }
}

// ============================================================================
// Options
// ============================================================================

/// Knobs shared by both strategies
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Delay between consecutive page requests
    pub sleep: Duration,
    /// Maximum pages per strategy (`None` for all). A cap of zero behaves like one.
    pub max_pages: Option<u32>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Primary results below this count trigger the fallback
    pub fallback_threshold: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            sleep: Duration::from_millis(200),
            max_pages: None,
            timeout: Duration::from_secs(60),
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
        }
    }
}

impl FetchOptions {
    /// Set the delay between requests
    #[must_use]
    pub fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the fallback threshold
    #[must_use]
    pub fn with_fallback_threshold(mut self, threshold: usize) -> Self {
        self.fallback_threshold = threshold;
        self
    }

    /// True once `pages_fetched` has reached the cap
    pub fn cap_reached(&self, pages_fetched: u32) -> bool {
        self.max_pages
            .is_some_and(|max| pages_fetched >= max.max(1))
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Which traversal produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Follow `next` URLs from the first data page
    NextLink,
    /// Walk `?page=N` on the data route
    PageNumber,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::NextLink => write!(f, "next-link"),
            Strategy::PageNumber => write!(f, "page-number"),
        }
    }
}

/// Why a strategy stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No further locator, or the reported last page was reached
    Exhausted,
    /// The page cap was reached
    PageCap,
    /// A request or decode failed
    FetchFailed,
    /// The data route answered 404 (stale build id)
    NotFound,
    /// The envelope carried no data
    NoData,
    /// A page came back without records
    EmptyPage,
}

/// Records accumulated by one strategy run
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    /// Strategy that ran
    pub strategy: Strategy,
    /// Records in page order
    pub records: Vec<Record>,
    /// Pages that returned data
    pub pages_fetched: u32,
    /// Why the run ended
    pub stop: StopReason,
}

impl StrategyRun {
    pub(crate) fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            records: Vec::new(),
            pages_fetched: 0,
            stop: StopReason::Exhausted,
        }
    }

    pub(crate) fn push_page(&mut self, records: Vec<Record>) {
        self.records.extend(records);
        self.pages_fetched += 1;
    }

    pub(crate) fn stopped(mut self, stop: StopReason) -> Self {
        self.stop = stop;
        self
    }
}

/// Result of the two-strategy fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The primary strategy met the threshold
    Primary(Vec<Record>),
    /// The primary strategy fell short; these are the fallback's records
    Fallback(Vec<Record>),
}

impl FetchOutcome {
    /// Records of the chosen strategy
    pub fn records(&self) -> &[Record] {
        match self {
            FetchOutcome::Primary(records) | FetchOutcome::Fallback(records) => records,
        }
    }

    /// Consume into the chosen records
    pub fn into_records(self) -> Vec<Record> {
        match self {
            FetchOutcome::Primary(records) | FetchOutcome::Fallback(records) => records,
        }
    }

    /// Strategy whose records were kept
    pub fn strategy(&self) -> Strategy {
        match self {
            FetchOutcome::Primary(_) => Strategy::NextLink,
            FetchOutcome::Fallback(_) => Strategy::PageNumber,
        }
    }

    /// True when no records were produced
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
