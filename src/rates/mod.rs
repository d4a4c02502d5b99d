//! Premium rate table
//!
//! Parses the contribution sheet of the rates workbook into typed
//! [`PremiumRate`] rows and loads them into the hosted database.
//!
//! # Layout
//!
//! The sheet has no header row. It holds four blocks, each a run of rows
//! with the age at an anchor column and the four benefit options in the
//! following columns:
//!
//! | Block        | Rows   | Anchor column |
//! |--------------|--------|---------------|
//! | M lumpsum    | 1-30   | 0             |
//! | M+1 lumpsum  | 1-30   | 7             |
//! | M annual     | 36-78  | 0             |
//! | M+1 annual   | 36-78  | 7             |

mod parser;
mod seed;
mod types;

pub use parser::{
    load_rate_table, parse_rate_table, RateBlock, RateTableParse, SkippedRow, RATES_SHEET,
    RATE_BLOCKS,
};
pub use seed::{import_summary, seed_rates, ImportSummary, SeedReport, DEFAULT_BATCH_SIZE};
pub use types::{
    payment_type_for_age, FamilySize, PaymentType, PremiumRate, RateRow, LUMPSUM_MIN_AGE, MAX_AGE,
    MIN_AGE,
};

#[cfg(test)]
mod tests;
