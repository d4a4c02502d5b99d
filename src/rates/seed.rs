//! Loading rates into the hosted database

use super::types::{FamilySize, PaymentType, PremiumRate, RateRow, MAX_AGE, MIN_AGE};
use crate::database::{Query, RestClient};
use crate::error::Result;
use tracing::{info, warn};

/// Rows per insert request
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Ages sampled after an import, oldest first
const SAMPLE_AGES: [u32; 3] = [MAX_AGE, 60, MIN_AGE];

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
}

/// Replace the rate table's contents with `rates`.
///
/// Clearing is best effort: a failed delete is logged and the insert
/// proceeds. Any failed insert batch aborts the run.
pub async fn seed_rates(
    db: &RestClient<'_>,
    rates: &[PremiumRate],
    batch_size: usize,
) -> Result<SeedReport> {
    let table = db.table();

    info!("Clearing existing data...");
    if let Err(e) = db.delete(table, Query::new().neq("id", 0)).await {
        warn!("Note: Could not clear existing data (table may be empty): {e}");
    }

    let mut inserted = 0;
    for batch in rates.chunks(batch_size.max(1)) {
        db.insert(table, batch).await?;
        inserted += batch.len();
        info!("Inserted {inserted}/{} records...", rates.len());
    }

    Ok(SeedReport { inserted })
}

/// Counts read back after an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub total: usize,
    pub principal_only: usize,
    pub with_spouse: usize,
    pub lumpsum: usize,
    pub annual: usize,
    /// Rows for the sampled ages, oldest first
    pub samples: Vec<PremiumRate>,
}

/// Read the table back and log totals plus a few sample rows
pub async fn import_summary(db: &RestClient<'_>) -> Result<ImportSummary> {
    let table = db.table();

    let rows: Vec<RateRow> = db
        .select(table, Query::new().select("age, family_size, payment_type"))
        .await?;

    let count_family = |size: FamilySize| {
        rows.iter()
            .filter(|r| r.family_size.as_deref() == Some(size.as_str()))
            .count()
    };
    let count_payment = |payment: PaymentType| {
        rows.iter()
            .filter(|r| r.payment_type.as_deref() == Some(payment.as_str()))
            .count()
    };

    let samples: Vec<PremiumRate> = db
        .select(
            table,
            Query::new()
                .select("*")
                .in_list("age", SAMPLE_AGES)
                .order("age", true),
        )
        .await?;

    let summary = ImportSummary {
        total: rows.len(),
        principal_only: count_family(FamilySize::M),
        with_spouse: count_family(FamilySize::MPlusOne),
        lumpsum: count_payment(PaymentType::Lumpsum),
        annual: count_payment(PaymentType::Annual),
        samples: samples.into_iter().take(6).collect(),
    };

    info!("Total Records: {}", summary.total);
    info!("  - M Only: {}", summary.principal_only);
    info!("  - M+1: {}", summary.with_spouse);
    info!("  - Lumpsum (61-90): {}", summary.lumpsum);
    info!("  - Annual (18-60): {}", summary.annual);
    for rate in &summary.samples {
        info!(
            "  Age {}, {}: {} - Option I: KES {}",
            rate.age,
            rate.family_size,
            rate.payment_type,
            format_amount(rate.option_1)
        );
    }

    Ok(summary)
}

/// Two decimals with thousands separators, e.g. `12,345.60`
pub(crate) fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
