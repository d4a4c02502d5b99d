//! Tool configuration
//!
//! An optional YAML file supplies defaults for every command. Each section
//! may be omitted. Database credentials can also come from the environment,
//! which takes precedence over the file, and command-line flags take
//! precedence over both.
//!
//! ```yaml
//! http:
//!   timeout_seconds: 60
//!   max_retries: 3
//!   verify_tls: true
//! facilities:
//!   base_url: https://kmhfl.health.go.ke
//!   sleep_seconds: 0.2
//!   output: kmhfr_facilities.xlsx
//! database:
//!   table: premium_rates
//! ```

use crate::database::{DatabaseConfig, DEFAULT_TABLE, SERVICE_KEY_ENV, URL_ENV};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, DEFAULT_RETRY_STATUSES};
use crate::output::DEFAULT_SHEET_NAME;
use crate::pagination::{
    FacilityEndpoints, FetchOptions, DEFAULT_BASE_URL, DEFAULT_FALLBACK_THRESHOLD,
    DEFAULT_LISTING_PATH,
};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete tool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// HTTP session settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Facility export settings
    #[serde(default)]
    pub facilities: FacilitiesConfig,

    /// Hosted database settings
    #[serde(default)]
    pub database: DatabaseSection,
}

impl ToolConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse and validate YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, else use defaults. Environment overrides apply
    /// either way.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(URL_ENV).none_if_empty() {
            self.database.url = Some(url);
        }
        if let Some(key) = lookup(SERVICE_KEY_ENV).none_if_empty() {
            self.database.service_key = Some(key);
        }
    }

    /// Check values that would otherwise fail later
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.facilities.base_url).map_err(|e| {
            Error::config(format!(
                "facilities.base_url '{}' is not a valid URL: {e}",
                self.facilities.base_url
            ))
        })?;

        if !self.facilities.sleep_seconds.is_finite() || self.facilities.sleep_seconds < 0.0 {
            return Err(Error::config(
                "facilities.sleep_seconds must be zero or positive",
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::config("http.timeout_seconds must be positive"));
        }

        if let Some(limit) = &self.http.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::config(
                    "http.rate_limit.requests_per_second must be positive",
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// HTTP status codes to retry on
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Optional client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_statuses: default_retry_statuses(),
            verify_tls: default_true(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Session configuration for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(self.timeout())
            .max_retries(self.max_retries)
            .retry_statuses(self.retry_statuses.iter().copied())
            .verify_tls(self.verify_tls)
            .backoff(
                self.retry_backoff.backoff_type,
                Duration::from_millis(self.retry_backoff.initial_ms),
                Duration::from_millis(self.retry_backoff.max_ms),
            );

        if let Some(limit) = &self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }

        builder.build()
    }
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_statuses() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}

fn default_true() -> bool {
    true
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_ms() -> u64 {
    30_000
}

// ============================================================================
// Facilities Config
// ============================================================================

/// Facility export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitiesConfig {
    /// Registry site root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listing path relative to the site root
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// Delay between page requests in seconds
    #[serde(default = "default_sleep_seconds")]
    pub sleep_seconds: f64,

    /// Page cap per strategy
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Primary results below this count trigger the fallback
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: usize,

    /// Output workbook
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Output sheet name
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

impl Default for FacilitiesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: default_listing_path(),
            sleep_seconds: default_sleep_seconds(),
            max_pages: None,
            fallback_threshold: default_fallback_threshold(),
            output: default_output(),
            sheet_name: default_sheet_name(),
        }
    }
}

impl FacilitiesConfig {
    pub fn endpoints(&self) -> FacilityEndpoints {
        FacilityEndpoints::new(&self.base_url, &self.listing_path)
    }

    /// Fetch options using `timeout` for each page request
    pub fn fetch_options(&self, timeout: Duration) -> Result<FetchOptions> {
        let sleep = Duration::try_from_secs_f64(self.sleep_seconds)
            .map_err(|e| Error::config(format!("invalid sleep {}: {e}", self.sleep_seconds)))?;

        Ok(FetchOptions::default()
            .with_sleep(sleep)
            .with_max_pages(self.max_pages)
            .with_timeout(timeout)
            .with_fallback_threshold(self.fallback_threshold))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_listing_path() -> String {
    DEFAULT_LISTING_PATH.to_string()
}

fn default_sleep_seconds() -> f64 {
    0.2
}

fn default_fallback_threshold() -> usize {
    DEFAULT_FALLBACK_THRESHOLD
}

fn default_output() -> PathBuf {
    PathBuf::from("kmhfr_facilities.xlsx")
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

// ============================================================================
// Database Config
// ============================================================================

/// Hosted database settings. Credentials are usually left to the environment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSection {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub service_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: default_table(),
        }
    }
}

impl std::fmt::Debug for DatabaseSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSection")
            .field("url", &self.url)
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("table", &self.table)
            .finish()
    }
}

impl DatabaseSection {
    /// Connection settings, failing on the first missing credential
    pub fn connection(&self) -> Result<DatabaseConfig> {
        let url = self
            .url
            .clone()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field(URL_ENV))?;
        let service_key = self
            .service_key
            .clone()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field(SERVICE_KEY_ENV))?;

        Ok(DatabaseConfig::new(url, service_key).with_table(&self.table))
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
