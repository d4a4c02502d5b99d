//! Hosted database access over PostgREST
//!
//! The premium rate table lives in a Supabase project. Rows are read and
//! written through its REST layer at `{url}/rest/v1/{table}`, authenticated
//! with the project's service key.

mod client;
mod query;

pub use client::{DatabaseConfig, RestClient, DEFAULT_TABLE, SERVICE_KEY_ENV, URL_ENV};
pub use query::Query;
