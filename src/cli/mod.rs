//! CLI module
//!
//! Command-line interface for the health data tools.
//!
//! # Commands
//!
//! - `facilities` - Export the facility registry to Excel
//! - `inspect` - Analyze the sheets of a workbook
//! - `seed` - Load premium rates into the database
//! - `verify` - Check the database rate table is complete

mod commands;
mod runner;

pub use commands::{Cli, Commands, FacilitiesArgs};
pub use runner::Runner;

#[cfg(test)]
mod tests;
