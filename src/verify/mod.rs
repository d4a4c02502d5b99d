//! Database completeness verification
//!
//! Every age from 18 to 90 must have a row for both family sizes, 146 rows in
//! all, and each row's payment type must match its age.

use crate::database::{Query, RestClient};
use crate::error::Result;
use crate::rates::{payment_type_for_age, FamilySize, RateRow, MAX_AGE, MIN_AGE};
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Mismatches listed before the rest are elided
const MAX_REPORTED_MISMATCHES: usize = 10;

/// Which age and family size combinations are present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessReport {
    pub expected: usize,
    pub found: usize,
    /// Absent combinations, by age then family size
    pub missing: Vec<(u32, FamilySize)>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Missing ages for one family size
    pub fn missing_ages(&self, family_size: FamilySize) -> Vec<u32> {
        self.missing
            .iter()
            .filter(|(_, size)| *size == family_size)
            .map(|(age, _)| *age)
            .collect()
    }
}

/// A row whose payment type does not match its age
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTypeMismatch {
    pub age: u32,
    pub actual: Option<String>,
    pub expected: String,
}

/// Result of [`verify_database`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Complete with correct payment types
    Passed { found: usize },
    /// No rows at all
    Empty,
    /// Some combinations are absent
    Missing(CompletenessReport),
    /// Complete, but some payment types are wrong
    PaymentTypeErrors(Vec<PaymentTypeMismatch>),
}

impl VerificationOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// Compare `rows` against every age and family size combination
pub fn check_completeness(rows: &[RateRow]) -> CompletenessReport {
    let existing: HashSet<(u32, &str)> = rows
        .iter()
        .filter_map(|r| r.family_size.as_deref().map(|size| (r.age, size)))
        .collect();

    let mut expected = 0;
    let mut missing = Vec::new();
    for age in MIN_AGE..=MAX_AGE {
        for size in FamilySize::ALL {
            expected += 1;
            if !existing.contains(&(age, size.as_str())) {
                missing.push((age, size));
            }
        }
    }

    CompletenessReport {
        expected,
        found: rows.len(),
        missing,
    }
}

/// Rows whose payment type differs from the one their age requires
pub fn check_payment_types(rows: &[RateRow]) -> Vec<PaymentTypeMismatch> {
    rows.iter()
        .filter_map(|row| {
            let expected = payment_type_for_age(row.age).as_str();
            (row.payment_type.as_deref() != Some(expected)).then(|| PaymentTypeMismatch {
                age: row.age,
                actual: row.payment_type.clone(),
                expected: expected.to_string(),
            })
        })
        .collect()
}

/// Short description of a set of ages
pub fn summarize_ages(ages: &[u32]) -> String {
    let mut ages = ages.to_vec();
    ages.sort_unstable();

    match (ages.first(), ages.last()) {
        (Some(first), Some(last)) if ages.len() > 5 => {
            format!("Ages {first}-{last} ({} ages)", ages.len())
        }
        (Some(_), _) => format!("{ages:?}"),
        _ => "None".to_string(),
    }
}

/// Fetch the rate table and check it
pub async fn verify_database(db: &RestClient<'_>) -> Result<VerificationOutcome> {
    info!("Fetching {} table...", db.table());
    let rows: Vec<RateRow> = db
        .select(
            db.table(),
            Query::new().select("age, family_size, payment_type"),
        )
        .await?;

    if rows.is_empty() {
        error!("No data found in {} table!", db.table());
        return Ok(VerificationOutcome::Empty);
    }
    info!("Found {} records", rows.len());

    let report = check_completeness(&rows);
    info!("Expected records: {}", report.expected);
    info!("Found records: {}", report.found);
    info!("Missing records: {}", report.missing.len());

    if !report.is_complete() {
        warn!("Missing age/family_size combinations:");
        for size in FamilySize::ALL {
            let ages = report.missing_ages(size);
            if !ages.is_empty() {
                warn!("  {size} ({}): {}", size.description(), summarize_ages(&ages));
            }
        }
        return Ok(VerificationOutcome::Missing(report));
    }
    info!("All required records are present");

    info!("Verifying payment types...");
    let mismatches = check_payment_types(&rows);
    if !mismatches.is_empty() {
        error!(
            "Found {} records with incorrect payment_type:",
            mismatches.len()
        );
        for m in mismatches.iter().take(MAX_REPORTED_MISMATCHES) {
            error!(
                "  Age {}: has '{}', should be '{}'",
                m.age,
                m.actual.as_deref().unwrap_or("None"),
                m.expected
            );
        }
        return Ok(VerificationOutcome::PaymentTypeErrors(mismatches));
    }

    info!("All payment types are correct");
    Ok(VerificationOutcome::Passed { found: rows.len() })
}

#[cfg(test)]
mod tests;
