//! Workbook inspection
//!
//! Reads every sheet of an Excel workbook and summarizes it: shape, column
//! names, inferred column kinds, leading rows, numeric statistics and missing
//! cell counts. The first row of each sheet is treated as the header.

mod report;
mod summary;

pub use report::render_report;
pub use summary::{summarize_range, ColumnKind, ColumnSummary, NumericStats, SheetSummary};

use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

/// Rows shown per sheet unless told otherwise
pub const DEFAULT_HEAD_ROWS: usize = 20;

/// Open `path` and summarize every sheet in workbook order
pub fn inspect_workbook(path: impl AsRef<Path>, head_rows: usize) -> Result<Vec<SheetSummary>> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();
    debug!("Workbook {} has sheets {:?}", path.display(), names);

    names
        .iter()
        .map(|name| -> Result<SheetSummary> {
            let range = workbook.worksheet_range(name)?;
            Ok(summarize_range(name, &range, head_rows))
        })
        .collect()
}

/// Load a single sheet's cell range
pub fn load_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<Range<Data>> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(Error::SheetNotFound {
            sheet: sheet.to_string(),
        });
    }
    Ok(workbook.worksheet_range(sheet)?)
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
