//! CLI commands and argument parsing

use crate::config::ToolConfig;
use crate::rates::DEFAULT_BATCH_SIZE;
use crate::workbook::DEFAULT_HEAD_ROWS;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Health data tools: facility registry export and premium rate loading
#[derive(Parser, Debug)]
#[command(name = "health-data-tools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every facility from the public registry to an Excel workbook
    Facilities(FacilitiesArgs),

    /// Print an analysis of every sheet in a workbook
    Inspect {
        /// Workbook to inspect
        #[arg(default_value = "Rates.xlsx")]
        path: PathBuf,

        /// Leading rows to show per sheet
        #[arg(long, default_value_t = DEFAULT_HEAD_ROWS)]
        rows: usize,
    },

    /// Load the premium rate table from a workbook into the database
    Seed {
        /// Rates workbook
        #[arg(default_value = "Rates.xlsx")]
        path: PathBuf,

        /// Rows per insert request
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Check the database holds a complete, consistent rate table
    Verify,
}

/// Flags for the facility export. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FacilitiesArgs {
    /// Output workbook [default: kmhfr_facilities.xlsx]
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Seconds to wait between page requests [default: 0.2]
    #[arg(long)]
    pub sleep: Option<f64>,

    /// Maximum pages to fetch per strategy
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Request timeout in seconds [default: 60]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retries for failed requests [default: 3]
    #[arg(long)]
    pub retries: Option<u32>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub no_verify_ssl: bool,
}

impl FacilitiesArgs {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut ToolConfig) {
        if let Some(out) = &self.out {
            config.facilities.output = out.clone();
        }
        if let Some(sleep) = self.sleep {
            config.facilities.sleep_seconds = sleep;
        }
        if self.max_pages.is_some() {
            config.facilities.max_pages = self.max_pages;
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_seconds = timeout;
        }
        if let Some(retries) = self.retries {
            config.http.max_retries = retries;
        }
        if self.no_verify_ssl {
            config.http.verify_tls = false;
        }
    }
}
