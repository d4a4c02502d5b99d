//! Excel writer
//!
//! Writes a [`FlatTable`] to a single-sheet `.xlsx` workbook.

use super::flatten::FlatTable;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;
use tracing::{info, warn};

/// Default sheet name for facility exports
pub const DEFAULT_SHEET_NAME: &str = "Facilities";

/// Longest string a cell can hold
pub(super) const MAX_CELL_CHARS: usize = 32_767;

/// Last addressable column index
const MAX_COLUMNS: usize = 16_384;

/// Write `table` to `path` as a workbook with one sheet.
///
/// Strings, numbers and booleans keep their types; arrays and objects are
/// written as JSON text; null and missing cells stay blank. An empty table
/// produces a sheet with headers only.
pub fn write_xlsx(table: &FlatTable, path: impl AsRef<Path>, sheet_name: &str) -> Result<()> {
    let path = path.as_ref();
    if table.is_empty() {
        warn!("Table is empty. Creating Excel file with headers only.");
    }
    if table.columns.len() > MAX_COLUMNS {
        return Err(Error::Other(format!(
            "{} columns exceed the worksheet limit of {MAX_COLUMNS}",
            table.columns.len()
        )));
    }

    info!("Saving to Excel: {}", path.display());

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, name) in table.columns.iter().enumerate() {
            if let Some(value) = row.get(name) {
                write_cell(worksheet, row_num, col as u16, value)?;
            }
        }
    }

    workbook.save(path)?;
    info!("Successfully saved {} records to {}", table.len(), path.display());
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &JsonValue) -> Result<()> {
    match value {
        JsonValue::Null => {}
        JsonValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        JsonValue::String(s) => {
            worksheet.write_string(row, col, clip(s))?;
        }
        other => {
            worksheet.write_string(row, col, clip(&other.to_string()))?;
        }
    }
    Ok(())
}

pub(super) fn clip(s: &str) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
