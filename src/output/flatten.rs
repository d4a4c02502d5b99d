//! Record flattening
//!
//! Turns nested JSON records into a flat table whose column names are the
//! dotted key paths (`owner.name`, `ward.county.code`).

use crate::types::{JsonObject, JsonValue, Record};
use std::collections::HashSet;

/// Columns moved to the front of the export when present
pub const PRIORITY_COLUMNS: [&str; 11] = [
    "id",
    "code",
    "name",
    "facility_type_name",
    "owner_name",
    "county",
    "constituency",
    "ward_name",
    "keph_level_name",
    "operation_status_name",
    "regulatory_status_name",
];

/// Separator between nested key segments
pub const KEY_SEPARATOR: &str = ".";

/// Flatten one record. Nested objects are expanded into dotted keys, so an
/// empty object contributes no column. Arrays and scalars are kept as values.
pub fn flatten_record(record: &Record) -> JsonObject {
    let mut flat = JsonObject::new();
    flatten_into(&mut flat, None, record);
    flat
}

fn flatten_into(flat: &mut JsonObject, prefix: Option<&str>, object: &JsonObject) {
    for (key, value) in object {
        let column = match prefix {
            Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{key}"),
            None => key.clone(),
        };

        match value {
            JsonValue::Object(nested) => {
                flatten_into(flat, Some(&column), nested);
            }
            other => {
                flat.insert(column, other.clone());
            }
        }
    }
}

/// Flattened records with a fixed column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTable {
    /// Column names in export order
    pub columns: Vec<String>,
    /// One flattened object per record
    pub rows: Vec<JsonObject>,
}

impl FlatTable {
    /// Flatten `records` and order columns: priority columns that exist
    /// first, then the rest in first-seen order.
    pub fn from_records(records: &[Record]) -> Self {
        let rows: Vec<JsonObject> = records.iter().map(flatten_record).collect();

        let mut seen = HashSet::new();
        let mut discovered = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    discovered.push(key.clone());
                }
            }
        }

        let mut columns: Vec<String> = PRIORITY_COLUMNS
            .iter()
            .filter(|c| seen.contains(**c))
            .map(ToString::to_string)
            .collect();
        columns.extend(
            discovered
                .into_iter()
                .filter(|c| !PRIORITY_COLUMNS.contains(&c.as_str())),
        );

        Self { columns, rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` for `column`; missing keys read as `None`
    pub fn cell(&self, row: usize, column: &str) -> Option<&JsonValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
