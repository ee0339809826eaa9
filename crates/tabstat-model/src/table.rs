//! Column-oriented table with typed, nullable cells.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Values of a single column. `None` marks a missing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Cell at `row` as a preview value. Out-of-range rows read as missing.
    pub fn preview_value(&self, row: usize) -> PreviewValue {
        match &self.data {
            ColumnData::Numeric(values) => match values.get(row) {
                Some(Some(value)) => PreviewValue::Number(*value),
                _ => PreviewValue::Missing,
            },
            ColumnData::Categorical(values) => match values.get(row) {
                Some(Some(value)) => PreviewValue::Text(value.clone()),
                _ => PreviewValue::Missing,
            },
        }
    }
}

/// An ordered sequence of named columns of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.clone()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.data.len();
            for column in &columns {
                let actual = column.data.len();
                if actual != expected {
                    return Err(TableError::RaggedColumn {
                        name: column.name.clone(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.data.len())
    }

    /// Numeric values of the named column, or `None` if absent or categorical.
    pub fn numeric_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Categorical values of the named column, or `None` if absent or numeric.
    pub fn categorical_values(&self, name: &str) -> Option<&[Option<String>]> {
        match &self.column(name)?.data {
            ColumnData::Categorical(values) => Some(values),
            ColumnData::Numeric(_) => None,
        }
    }

    /// The first `limit` rows, one ordered name -> value map per row.
    pub fn preview(&self, limit: usize) -> Vec<PreviewRow> {
        let rows = self.row_count().min(limit);
        (0..rows)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| (column.name.clone(), column.preview_value(row)))
                    .collect()
            })
            .collect()
    }
}

/// A preview cell. `Missing` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviewValue {
    Number(f64),
    Text(String),
    Missing,
}

pub type PreviewRow = BTreeMap<String, PreviewValue>;
