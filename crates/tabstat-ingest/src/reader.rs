//! CSV file -> [`Table`] materialization.
//!
//! Cells are trimmed and BOM-stripped; fully empty rows are skipped. A
//! column is inferred numeric when it has at least one non-empty cell and
//! every non-empty cell parses as `f64`; all other columns are categorical.
//! Empty cells become missing entries either way.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use tabstat_model::{Column, Table};

use crate::error::Result;

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file into a typed table. The first record is the header row.
pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = (0..headers.len())
            .map(|idx| normalize_cell(record.get(idx).unwrap_or("")))
            .collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read csv table"
    );
    build_table(headers, &rows)
}

fn build_table(headers: Vec<String>, rows: &[Vec<String>]) -> Result<Table> {
    let mut columns = Vec::with_capacity(headers.len());
    for (idx, name) in headers.into_iter().enumerate() {
        let cells: Vec<&str> = rows
            .iter()
            .map(|row| row.get(idx).map_or("", String::as_str))
            .collect();
        columns.push(infer_column(name, &cells));
    }
    Ok(Table::new(columns)?)
}

/// Numeric iff the column has at least one non-empty cell and every
/// non-empty cell parses as a number.
fn infer_column(name: String, cells: &[&str]) -> Column {
    let mut non_empty = 0usize;
    let mut numeric = 0usize;
    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        non_empty += 1;
        if cell.parse::<f64>().is_ok() {
            numeric += 1;
        }
    }
    if non_empty > 0 && numeric == non_empty {
        let values = cells
            .iter()
            .map(|cell| cell.parse::<f64>().ok())
            .collect();
        Column::numeric(name, values)
    } else {
        let values = cells
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    None
                } else {
                    Some((*cell).to_string())
                }
            })
            .collect();
        Column::categorical(name, values)
    }
}
