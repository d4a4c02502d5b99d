//! HTTP session module
//!
//! Provides the shared HTTP client with retry, backoff and optional rate limiting.
//!
//! # Features
//!
//! - **Automatic Retries**: retried on a configurable status set (502/503/504 by default)
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **TLS Verification**: can be switched off for hosts with broken chains
//! - **Rate Limiting**: optional token bucket limiter using governor

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, BROWSER_USER_AGENT,
    DEFAULT_RETRY_STATUSES,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
