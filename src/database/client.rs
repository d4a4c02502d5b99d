//! PostgREST client over the shared HTTP session

use super::query::Query;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Environment variable holding the project URL
pub const URL_ENV: &str = "SUPABASE_URL";

/// Environment variable holding the service role key
pub const SERVICE_KEY_ENV: &str = "SUPABASE_SERVICE_KEY";

/// Table holding premium rates
pub const DEFAULT_TABLE: &str = "premium_rates";

/// Connection settings for the hosted database
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Service role key
    pub service_key: String,
    /// Default table
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
            table: default_table(),
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

// The service key never appears in logs
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

/// Reads and writes table rows through PostgREST
#[derive(Debug)]
pub struct RestClient<'a> {
    client: &'a HttpClient,
    config: DatabaseConfig,
    rest_base: Url,
}

impl<'a> RestClient<'a> {
    /// Create a client. Fails when the project URL does not parse.
    pub fn new(client: &'a HttpClient, config: DatabaseConfig) -> Result<Self> {
        let mut base = config.url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let rest_base = Url::parse(&base)?.join("rest/v1/")?;

        Ok(Self {
            client,
            config,
            rest_base,
        })
    }

    /// Default table name
    pub fn table(&self) -> &str {
        &self.config.table
    }

    /// Endpoint for `table`
    pub fn table_url(&self, table: &str) -> Result<Url> {
        Ok(self.rest_base.join(table)?)
    }

    /// Fetch rows matching `query`
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: Query) -> Result<Vec<T>> {
        let url = self.table_url(table)?;
        debug!("Selecting from {table} with {:?}", query.params());

        let request = self.with_query(self.authorized(), query);
        self.client
            .request_json(Method::GET.into(), url.as_str(), request)
            .await
    }

    /// Insert `rows` in one request
    pub async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        let url = self.table_url(table)?;
        debug!("Inserting {} rows into {table}", rows.len());

        let body = serde_json::to_value(rows)?;
        let request = self.write_request().json(body);
        self.client
            .request(Method::POST.into(), url.as_str(), request)
            .await?;
        Ok(())
    }

    /// Delete rows matching `query`
    pub async fn delete(&self, table: &str, query: Query) -> Result<()> {
        if query.is_empty() {
            return Err(Error::database(format!(
                "refusing to delete from {table} without a filter"
            )));
        }

        let url = self.table_url(table)?;
        debug!("Deleting from {table} with {:?}", query.params());

        let request = self.with_query(self.write_request(), query);
        self.client
            .request(Method::DELETE.into(), url.as_str(), request)
            .await?;
        Ok(())
    }

    fn authorized(&self) -> RequestConfig {
        RequestConfig::new()
            .header("apikey", self.config.service_key.as_str())
            .header(
                "Authorization",
                format!("Bearer {}", self.config.service_key),
            )
    }

    // Writes are not idempotent, so they are never retried
    fn write_request(&self) -> RequestConfig {
        self.authorized()
            .header("Prefer", "return=minimal")
            .retries(0)
    }

    fn with_query(&self, request: RequestConfig, query: Query) -> RequestConfig {
        query
            .params()
            .iter()
            .fold(request, |request, (key, value)| request.query(key, value))
    }
}
