//! Output module
//!
//! Serializes fetched records for people who live in spreadsheets.
//!
//! # Overview
//!
//! - Flattening nested JSON records into dotted columns
//! - Ordering columns with the registry's key fields first
//! - Writing the table to an `.xlsx` workbook

mod flatten;
mod writer;

pub use flatten::{flatten_record, FlatTable, KEY_SEPARATOR, PRIORITY_COLUMNS};
pub use writer::{write_xlsx, DEFAULT_SHEET_NAME};
