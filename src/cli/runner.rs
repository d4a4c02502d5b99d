//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FacilitiesArgs};
use crate::config::ToolConfig;
use crate::database::RestClient;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::output::{write_xlsx, FlatTable};
use crate::pagination::fetch_all;
use crate::rates::{import_summary, load_rate_table, seed_rates, RATES_SHEET};
use crate::verify::{summarize_ages, verify_database, VerificationOutcome};
use crate::workbook::{inspect_workbook, render_report};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Facilities(args) => self.facilities(args).await,
            Commands::Inspect { path, rows } => self.inspect(path, *rows),
            Commands::Seed { path, batch_size } => self.seed(path, *batch_size).await,
            Commands::Verify => self.verify().await,
        }
    }

    /// Load the config file, if any, with environment overrides
    fn load_config(&self) -> Result<ToolConfig> {
        ToolConfig::resolve(self.cli.config.as_deref())
    }

    // ========================================================================
    // facilities
    // ========================================================================

    async fn facilities(&self, args: &FacilitiesArgs) -> Result<()> {
        let mut config = self.load_config()?;
        args.apply(&mut config);
        config.validate()?;

        let started = Instant::now();
        let client = HttpClient::with_config(config.http.client_config())?;
        let options = config.facilities.fetch_options(config.http.timeout())?;

        let records = fetch_all(&client, config.facilities.endpoints(), options).await;
        if records.is_empty() {
            error!("No facilities retrieved.");
            return Err(Error::NoRecords);
        }
        info!(
            "Retrieved {} facilities in {:.1}s",
            records.len(),
            started.elapsed().as_secs_f64()
        );

        let output = &config.facilities.output;
        let table = FlatTable::from_records(&records);
        write_xlsx(&table, output, &config.facilities.sheet_name)
            .with_context(|| format!("Writing {}", output.display()))?;
        info!("Done.");
        Ok(())
    }

    // ========================================================================
    // inspect
    // ========================================================================

    fn inspect(&self, path: &Path, rows: usize) -> Result<()> {
        let sheets = inspect_workbook(path, rows)
            .with_context(|| format!("Inspecting {}", path.display()))?;
        print!("{}", render_report(&path.display().to_string(), &sheets));
        Ok(())
    }

    // ========================================================================
    // seed
    // ========================================================================

    async fn seed(&self, path: &Path, batch_size: usize) -> Result<()> {
        let config = self.load_config()?;

        info!("Reading {} from {}", RATES_SHEET, path.display());
        let parsed = load_rate_table(path)
            .with_context(|| format!("Reading rates from {}", path.display()))?;
        if !parsed.skipped.is_empty() {
            warn!("Skipped {} unreadable rows", parsed.skipped.len());
        }
        if parsed.rates.is_empty() {
            return Err(Error::Other(format!(
                "no premium rates found in {}",
                path.display()
            )));
        }
        info!("Read {} records", parsed.rates.len());
        for rate in parsed.rates.iter().take(3) {
            info!(
                "  age {} {} {}: {} / {} / {} / {}",
                rate.age,
                rate.family_size,
                rate.payment_type,
                rate.option_1,
                rate.option_2,
                rate.option_3,
                rate.option_4
            );
        }

        let connection = config.database.connection()?;
        let client = HttpClient::with_config(config.http.client_config())?;
        let db = RestClient::new(&client, connection)?;

        info!("Uploading to {}...", db.table());
        let report = seed_rates(&db, &parsed.rates, batch_size).await?;
        info!("Uploaded {} records", report.inserted);

        info!("Verifying import...");
        if let Err(e) = import_summary(&db).await {
            warn!("Verification failed: {e}");
        }

        info!("Import complete");
        Ok(())
    }

    // ========================================================================
    // verify
    // ========================================================================

    async fn verify(&self) -> Result<()> {
        let config = self.load_config()?;
        let connection = config.database.connection()?;

        let client = HttpClient::with_config(config.http.client_config())?;
        let db = RestClient::new(&client, connection)?;

        let outcome = verify_database(&db).await?;
        if outcome.passed() {
            info!("Database verification PASSED");
            return Ok(());
        }

        error!("Database verification FAILED");
        Err(Error::verification(failure_reason(&outcome)))
    }
}

/// One-line description of a failed verification
pub(crate) fn failure_reason(outcome: &VerificationOutcome) -> String {
    match outcome {
        VerificationOutcome::Passed { .. } => "passed".to_string(),
        VerificationOutcome::Empty => "rate table is empty; run the seed command".to_string(),
        VerificationOutcome::Missing(report) => {
            let mut ages: Vec<u32> = report.missing.iter().map(|(age, _)| *age).collect();
            ages.dedup();
            format!(
                "{} of {} records missing ({})",
                report.missing.len(),
                report.expected,
                summarize_ages(&ages)
            )
        }
        VerificationOutcome::PaymentTypeErrors(mismatches) => {
            format!("{} records with incorrect payment_type", mismatches.len())
        }
    }
}
