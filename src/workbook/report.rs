//! Text rendering of workbook summaries

use super::summary::SheetSummary;
use std::fmt::Write;

const RULE: &str = "============================================================";

/// Render a human-readable analysis of every sheet
pub fn render_report(label: &str, sheets: &[SheetSummary]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "EXCEL FILE ANALYSIS: {label}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Number of sheets: {}", sheets.len());
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    let _ = writeln!(out, "Sheet names: {names:?}");

    for sheet in sheets {
        render_sheet(&mut out, sheet);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "END OF ANALYSIS");
    let _ = writeln!(out, "{RULE}");
    out
}

fn render_sheet(out: &mut String, sheet: &SheetSummary) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "SHEET: {}", sheet.name);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Shape: {} rows x {} columns",
        sheet.rows,
        sheet.columns.len()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Columns: {:?}", sheet.column_names());

    let _ = writeln!(out);
    let _ = writeln!(out, "Data Types:");
    for column in &sheet.columns {
        let _ = writeln!(out, "  {}: {}", column.name, column.kind);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "First {} rows:", sheet.head.len());
    render_table(out, &sheet.column_names(), &sheet.head);

    let numeric: Vec<_> = sheet.numeric_columns().collect();
    if !numeric.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Basic Statistics for Numeric Columns:");
        let header: Vec<&str> = numeric.iter().map(|c| c.name.as_str()).collect();
        let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
        let rows: Vec<Vec<String>> = labels
            .iter()
            .map(|label| {
                let mut row = vec![label.to_string()];
                row.extend(numeric.iter().map(|c| {
                    c.stats
                        .as_ref()
                        .map(|s| stat_cell(label, s))
                        .unwrap_or_else(|| "NaN".to_string())
                }));
                row
            })
            .collect();
        let mut columns = vec![""];
        columns.extend(header);
        render_table(out, &columns, &rows);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Missing Values:");
    let mut any_missing = false;
    for column in sheet.columns.iter().filter(|c| c.missing > 0) {
        any_missing = true;
        let _ = writeln!(out, "  {}: {}", column.name, column.missing);
    }
    if !any_missing {
        let _ = writeln!(out, "  None");
    }
}

fn stat_cell(label: &str, stats: &super::NumericStats) -> String {
    let value = match label {
        "count" => return stats.count.to_string(),
        "mean" => stats.mean,
        "std" => match stats.std {
            Some(std) => std,
            None => return "NaN".to_string(),
        },
        "min" => stats.min,
        "25%" => stats.q25,
        "50%" => stats.q50,
        "75%" => stats.q75,
        _ => stats.max,
    };
    format!("{value:.6}")
}

fn render_table(out: &mut String, header: &[&str], rows: &[Vec<String>]) {
    let width = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; width];
    for (idx, name) in header.iter().enumerate() {
        widths[idx] = widths[idx].max(name.chars().count());
    }
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let line = |cells: &mut dyn Iterator<Item = &str>| -> String {
        cells
            .enumerate()
            .map(|(idx, cell)| format!("{cell:>w$}", w = widths[idx]))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let _ = writeln!(out, "{}", line(&mut header.iter().copied()));
    for row in rows {
        let _ = writeln!(out, "{}", line(&mut row.iter().map(String::as_str)));
    }
}
