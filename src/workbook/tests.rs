//! Tests for workbook inspection

use super::*;
use calamine::{Data, Range};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn sample_range() -> Range<Data> {
    let mut range = Range::new((0, 0), (4, 3));
    let header = ["age", "premium", "", "note"];
    for (col, name) in header.iter().enumerate() {
        if !name.is_empty() {
            range.set_value((0, col as u32), Data::String(name.to_string()));
        }
    }

    range.set_value((1, 0), Data::Float(18.0));
    range.set_value((2, 0), Data::Float(30.0));
    range.set_value((3, 0), Data::Float(45.0));
    range.set_value((4, 0), Data::Float(60.0));

    range.set_value((1, 1), Data::Float(1200.5));
    range.set_value((2, 1), Data::Int(1500));
    range.set_value((4, 1), Data::Float(2100.0));

    range.set_value((1, 3), Data::String("ok".to_string()));
    range.set_value((2, 3), Data::Float(3.0));
    range
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summarize_range_shape_and_headers() {
    let summary = summarize_range("Rates", &sample_range(), DEFAULT_HEAD_ROWS);

    assert_eq!(summary.name, "Rates");
    assert_eq!(summary.rows, 4);
    assert_eq!(
        summary.column_names(),
        vec!["age", "premium", "Unnamed: 2", "note"]
    );
}

#[test]
fn test_summarize_range_column_kinds() {
    let summary = summarize_range("Rates", &sample_range(), DEFAULT_HEAD_ROWS);

    assert_eq!(summary.column("age").unwrap().kind, ColumnKind::Int);
    assert_eq!(summary.column("premium").unwrap().kind, ColumnKind::Float);
    assert_eq!(summary.column("Unnamed: 2").unwrap().kind, ColumnKind::Empty);
    assert_eq!(summary.column("note").unwrap().kind, ColumnKind::Mixed);
}

#[test]
fn test_summarize_range_missing_counts() {
    let summary = summarize_range("Rates", &sample_range(), DEFAULT_HEAD_ROWS);

    assert_eq!(summary.column("age").unwrap().missing, 0);
    assert_eq!(summary.column("premium").unwrap().missing, 1);
    assert_eq!(summary.column("Unnamed: 2").unwrap().missing, 4);
    assert_eq!(summary.column("note").unwrap().missing, 2);
}

#[test]
fn test_summarize_range_numeric_stats() {
    let summary = summarize_range("Rates", &sample_range(), DEFAULT_HEAD_ROWS);
    let stats = summary.column("age").unwrap().stats.clone().unwrap();

    assert_eq!(stats.count, 4);
    assert_eq!(stats.mean, 38.25);
    assert_eq!(stats.min, 18.0);
    assert_eq!(stats.q25, 27.0);
    assert_eq!(stats.q50, 37.5);
    assert_eq!(stats.q75, 48.75);
    assert_eq!(stats.max, 60.0);
    assert!(summary.column("note").unwrap().stats.is_none());
    assert_eq!(summary.numeric_columns().count(), 2);
}

#[test]
fn test_summarize_range_head_limit() {
    let summary = summarize_range("Rates", &sample_range(), 2);

    assert_eq!(summary.head.len(), 2);
    assert_eq!(summary.head[0], vec!["18", "1200.5", "NaN", "ok"]);
}

#[test]
fn test_summarize_empty_range() {
    let summary = summarize_range("Blank", &Range::empty(), DEFAULT_HEAD_ROWS);

    assert_eq!(summary.rows, 0);
    assert!(summary.columns.is_empty());
    assert!(summary.head.is_empty());
}

#[test]
fn test_numeric_stats_single_value() {
    let stats = NumericStats::from_values(&[5.0]).unwrap();
    assert_eq!(stats.std, None);
    assert_eq!(stats.q25, 5.0);
    assert!(NumericStats::from_values(&[]).is_none());
}

#[test]
fn test_numeric_stats_sample_std() {
    let stats = NumericStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    let std = stats.std.unwrap();
    assert!((std - 2.138_089_935).abs() < 1e-6);
}

// ============================================================================
// Workbook Tests
// ============================================================================

fn write_workbook(path: &std::path::Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Contribution Amounts").unwrap();
    sheet.write_string(0, 0, "Age").unwrap();
    sheet.write_string(0, 1, "Option 1").unwrap();
    sheet.write_number(1, 0, 18).unwrap();
    sheet.write_number(1, 1, 1000.0).unwrap();
    sheet.write_number(2, 0, 19).unwrap();
    sheet.write_number(2, 1, 1100.0).unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Remark").unwrap();
    notes.write_string(1, 0, "Rates effective 2024").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn test_inspect_workbook_reads_every_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Rates.xlsx");
    write_workbook(&path);

    let sheets = inspect_workbook(&path, DEFAULT_HEAD_ROWS).unwrap();

    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].name, "Contribution Amounts");
    assert_eq!(sheets[0].rows, 2);
    assert_eq!(sheets[0].column_names(), vec!["Age", "Option 1"]);
    assert_eq!(sheets[1].name, "Notes");
    assert_eq!(sheets[1].column("Remark").unwrap().kind, ColumnKind::String);
}

#[test]
fn test_inspect_workbook_missing_file() {
    let dir = tempdir().unwrap();
    let err = inspect_workbook(dir.path().join("missing.xlsx"), 5).unwrap_err();
    assert!(matches!(err, crate::Error::FileNotFound { .. }));
}

#[test]
fn test_load_sheet_by_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Rates.xlsx");
    write_workbook(&path);

    let range = load_sheet(&path, "Contribution Amounts").unwrap();
    assert_eq!(range.get_size(), (3, 2));

    let err = load_sheet(&path, "Other").unwrap_err();
    assert!(matches!(err, crate::Error::SheetNotFound { ref sheet } if sheet == "Other"));
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_render_report_sections() {
    let summary = summarize_range("Rates", &sample_range(), DEFAULT_HEAD_ROWS);
    let report = render_report("Rates.xlsx", &[summary]);

    assert!(report.contains("EXCEL FILE ANALYSIS: Rates.xlsx"));
    assert!(report.contains("Number of sheets: 1"));
    assert!(report.contains("SHEET: Rates"));
    assert!(report.contains("Shape: 4 rows x 4 columns"));
    assert!(report.contains("  premium: float"));
    assert!(report.contains("Basic Statistics for Numeric Columns:"));
    assert!(report.contains("  Unnamed: 2: 4"));
    assert!(report.trim_end().ends_with("============================================================"));
}

#[test]
fn test_render_report_without_numeric_columns() {
    let mut range = Range::new((0, 0), (1, 0));
    range.set_value((0, 0), Data::String("name".to_string()));
    range.set_value((1, 0), Data::String("Nairobi".to_string()));
    let report = render_report("x.xlsx", &[summarize_range("S", &range, 5)]);

    assert!(!report.contains("Basic Statistics"));
    assert!(report.contains("Nairobi"));
}
