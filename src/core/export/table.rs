use crate::core::package::flatten::{Row, BASE_COLUMNS, COMPONENT_COLUMNS};
use indexmap::IndexSet;

/// Rows materialized against the union of every column they mention.
///
/// Base columns come first in their fixed order, then the component columns when any row has
/// them, then every remaining column in first-seen order. Absent values become empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut columns: IndexSet<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();

        let has_components = rows
            .iter()
            .any(|row| COMPONENT_COLUMNS.iter().any(|c| row.contains_column(c)));
        if has_components {
            columns.extend(COMPONENT_COLUMNS.iter().map(|c| c.to_string()));
        }

        for row in rows {
            for column in row.columns() {
                if !columns.contains(column) {
                    columns.insert(column.to_string());
                }
            }
        }

        let records = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Self {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cell at `row` for `column`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.records
            .get(row)
            .and_then(|record| record.get(index))
            .map(String::as_str)
    }
}
