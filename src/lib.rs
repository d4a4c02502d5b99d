// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Health Data Tools
//!
//! Utilities around two public health datasets:
//!
//! - **Facility registry export**: walks every page of the Kenya Master Health
//!   Facility List through its Next.js data route and writes the records to
//!   an Excel workbook.
//! - **Premium rates**: reads the contribution table from the rates workbook,
//!   loads it into a Supabase table and verifies the table is complete.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use health_data_tools::http::HttpClient;
//! use health_data_tools::output::{write_xlsx, FlatTable};
//! use health_data_tools::pagination::{fetch_all, FacilityEndpoints, FetchOptions};
//!
//! #[tokio::main]
//! async fn main() -> health_data_tools::Result<()> {
//!     let client = HttpClient::new()?;
//!     let records = fetch_all(&client, FacilityEndpoints::default(), FetchOptions::default()).await;
//!
//!     let table = FlatTable::from_records(&records);
//!     write_xlsx(&table, "kmhfr_facilities.xlsx", "Facilities")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        CLI (clap)                             │
//! │   facilities        inspect          seed          verify     │
//! └───────────────────────────────────────────────────────────────┘
//!        │                  │               │              │
//! ┌──────┴──────┐    ┌──────┴─────┐   ┌─────┴─────┐  ┌─────┴─────┐
//! │ Discovery   │    │ Workbook   │   │ Rates     │  │ Verify    │
//! │ Pagination  │    │ (calamine) │   │ parser    │  │           │
//! │ Output xlsx │    │            │   │ seeding   │  │           │
//! └──────┬──────┘    └────────────┘   └─────┬─────┘  └─────┬─────┘
//!        │                                  └──────┬───────┘
//! ┌──────┴──────────────────────────────────────────┴─────────────┐
//! │          HTTP session (retry, backoff, rate limit)            │
//! │          PostgREST client                                     │
//! └───────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tool configuration
pub mod config;

/// HTTP session with retry and rate limiting
pub mod http;

/// Next.js build id discovery
pub mod discovery;

/// Facility listing pagination
pub mod pagination;

/// Record flattening and Excel export
pub mod output;

/// Workbook inspection
pub mod workbook;

/// Premium rate table parsing and seeding
pub mod rates;

/// PostgREST access to the hosted database
pub mod database;

/// Rate table verification
pub mod verify;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use pagination::{fetch_all, FacilityEndpoints, FetchOptions, PaginatedFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
