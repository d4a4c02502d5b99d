//! Contribution sheet parser

use super::types::{FamilySize, PaymentType, PremiumRate};
use crate::error::Result;
use crate::workbook::load_sheet;
use calamine::{Data, Range};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Sheet holding the rate blocks
pub const RATES_SHEET: &str = "Contribution Amounts";

/// A run of rows sharing family size and payment type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBlock {
    pub family_size: FamilySize,
    pub payment_type: PaymentType,
    /// First row, zero-based
    pub first_row: u32,
    /// Last row, inclusive
    pub last_row: u32,
    /// Column holding the age; options follow it
    pub anchor_col: u32,
}

impl RateBlock {
    pub fn label(&self) -> String {
        let payment = match self.payment_type {
            PaymentType::Lumpsum => "Lumpsum",
            PaymentType::Annual => "Annual",
        };
        format!("{} {payment}", self.family_size)
    }
}

impl fmt::Display for RateBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Blocks in read order
pub const RATE_BLOCKS: [RateBlock; 4] = [
    RateBlock {
        family_size: FamilySize::M,
        payment_type: PaymentType::Lumpsum,
        first_row: 1,
        last_row: 30,
        anchor_col: 0,
    },
    RateBlock {
        family_size: FamilySize::MPlusOne,
        payment_type: PaymentType::Lumpsum,
        first_row: 1,
        last_row: 30,
        anchor_col: 7,
    },
    RateBlock {
        family_size: FamilySize::M,
        payment_type: PaymentType::Annual,
        first_row: 36,
        last_row: 78,
        anchor_col: 0,
    },
    RateBlock {
        family_size: FamilySize::MPlusOne,
        payment_type: PaymentType::Annual,
        first_row: 36,
        last_row: 78,
        anchor_col: 7,
    },
];

/// A row that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: u32,
    pub block: String,
    pub reason: String,
}

/// Parsed rates plus the rows that were skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTableParse {
    pub rates: Vec<PremiumRate>,
    pub skipped: Vec<SkippedRow>,
}

/// Read the four rate blocks out of `range`.
///
/// Positions are absolute sheet coordinates. A row whose age or any option
/// is blank or not numeric is skipped with a warning.
pub fn parse_rate_table(range: &Range<Data>) -> RateTableParse {
    let mut parsed = RateTableParse::default();

    for block in &RATE_BLOCKS {
        info!("Processing {block} (rows {}-{})...", block.first_row, block.last_row);

        for row in block.first_row..=block.last_row {
            match parse_row(range, block, row) {
                Ok(rate) => parsed.rates.push(rate),
                Err(reason) => {
                    warn!("Skipping row {row} ({block}): {reason}");
                    parsed.skipped.push(SkippedRow {
                        row,
                        block: block.label(),
                        reason,
                    });
                }
            }
        }
    }

    parsed
}

/// Open `path` and parse its contribution sheet
pub fn load_rate_table(path: impl AsRef<Path>) -> Result<RateTableParse> {
    let range = load_sheet(path, RATES_SHEET)?;
    Ok(parse_rate_table(&range))
}

fn parse_row(
    range: &Range<Data>,
    block: &RateBlock,
    row: u32,
) -> std::result::Result<PremiumRate, String> {
    let col = block.anchor_col;
    let age = read_age(range.get_value((row, col)))?;
    let option = |offset: u32| read_amount(range.get_value((row, col + offset)), offset);

    Ok(PremiumRate {
        age,
        family_size: block.family_size,
        payment_type: block.payment_type,
        option_1: option(1)?,
        option_2: option(2)?,
        option_3: option(3)?,
        option_4: option(4)?,
    })
}

// Whole ages only; fractional values are truncated toward zero
fn read_age(cell: Option<&Data>) -> std::result::Result<u32, String> {
    let value = match cell.unwrap_or(&Data::Empty) {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| i as f64)
            .map_err(|_| format!("age {s:?} is not a whole number"))?,
        Data::Empty => return Err("age is missing".to_string()),
        other => return Err(format!("age {other:?} is not numeric")),
    };

    if !value.is_finite() {
        return Err("age is not finite".to_string());
    }
    let age = value.trunc();
    if age < 0.0 || age > f64::from(u32::MAX) {
        return Err(format!("age {age} is out of range"));
    }
    Ok(age as u32)
}

fn read_amount(cell: Option<&Data>, option: u32) -> std::result::Result<f64, String> {
    match cell.unwrap_or(&Data::Empty) {
        Data::Int(i) => Ok(*i as f64),
        Data::Float(f) => Ok(*f),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("option {option} value {s:?} is not numeric")),
        Data::Empty => Err(format!("option {option} is missing")),
        other => Err(format!("option {option} value {other:?} is not numeric")),
    }
}
