//! Per-sheet summaries

use calamine::{Data, DataType, Range};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::fmt;

/// Inferred kind of a column, ignoring blank cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKind {
    Int,
    Float,
    Bool,
    DateTime,
    String,
    /// Every cell is blank
    Empty,
    /// More than one kind, other than int and float together
    Mixed,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::DateTime => "datetime",
            Self::String => "string",
            Self::Empty => "empty",
            Self::Mixed => "mixed",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    fn of_cell(cell: &Data) -> Option<Self> {
        match cell {
            Data::Empty => None,
            Data::Int(_) => Some(Self::Int),
            // Excel stores every number as a double; whole values read as ints
            Data::Float(f) if f.fract() == 0.0 => Some(Self::Int),
            Data::Float(_) => Some(Self::Float),
            Data::Bool(_) => Some(Self::Bool),
            Data::DateTime(_) | Data::DateTimeIso(_) => Some(Self::DateTime),
            Data::String(s) if s.trim().is_empty() => None,
            Data::String(_) | Data::DurationIso(_) | Data::Error(_) => Some(Self::String),
        }
    }

    fn combine(kinds: &BTreeSet<Self>) -> Self {
        let mut iter = kinds.iter();
        match (iter.next(), iter.next(), iter.next()) {
            (None, _, _) => Self::Empty,
            (Some(kind), None, _) => *kind,
            (Some(Self::Int), Some(Self::Float), None) => Self::Float,
            _ => Self::Mixed,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive statistics over a numeric column's non-blank cells
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, absent for a single value
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericStats {
    /// Compute statistics, or `None` when `values` is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear interpolation between closest ranks over sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Summary of one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    /// Blank cells below the header
    pub missing: usize,
    pub stats: Option<NumericStats>,
}

/// Summary of one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    /// Data rows, header excluded
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    /// Leading data rows rendered as text, blank cells as `NaN`
    pub head: Vec<Vec<String>>,
}

impl SheetSummary {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter().filter(|c| c.stats.is_some())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Summarize a sheet's cell range. The first row supplies the headers.
pub fn summarize_range(name: &str, range: &Range<Data>, head_rows: usize) -> SheetSummary {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return SheetSummary {
            name: name.to_string(),
            rows: 0,
            columns: Vec::new(),
            head: Vec::new(),
        };
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| summarize_column(header_name(idx, cell), idx, &body))
        .collect();

    let head = body
        .iter()
        .take(head_rows)
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    SheetSummary {
        name: name.to_string(),
        rows: body.len(),
        columns,
        head,
    }
}

fn header_name(idx: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {idx}"),
        Data::String(s) if s.trim().is_empty() => format!("Unnamed: {idx}"),
        other => other.to_string(),
    }
}

fn summarize_column(name: String, idx: usize, body: &[&[Data]]) -> ColumnSummary {
    let mut kinds = BTreeSet::new();
    let mut numbers = Vec::new();
    let mut missing = 0;

    for row in body {
        let cell = row.get(idx).unwrap_or(&Data::Empty);
        match ColumnKind::of_cell(cell) {
            Some(kind) => {
                kinds.insert(kind);
                if let Some(n) = numeric_value(cell) {
                    numbers.push(n);
                }
            }
            None => missing += 1,
        }
    }

    let kind = ColumnKind::combine(&kinds);
    let stats = if kind.is_numeric() {
        NumericStats::from_values(&numbers)
    } else {
        None
    };

    ColumnSummary {
        name,
        kind,
        missing,
        stats,
    }
}

fn numeric_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}

fn display_cell(cell: &Data) -> String {
    match ColumnKind::of_cell(cell) {
        None => "NaN".to_string(),
        Some(ColumnKind::DateTime) => cell
            .as_datetime()
            .map(|dt: NaiveDateTime| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Some(_) => cell.to_string(),
    }
}
