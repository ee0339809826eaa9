//! Aggregate analysis result for one table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::records::{CorrelationRanking, TestRecord};
use crate::table::PreviewRow;

/// Partition of a table's columns by inferred type, in original column
/// order. Every column name appears in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

/// Row/column counts, classified columns, and per-column missing counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub rows: usize,
    pub columns: usize,
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    pub missing_values: BTreeMap<String, usize>,
}

/// Everything the engine derives from one uploaded table. Built once,
/// immutable, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub basic_info: BasicInfo,
    pub statistical_tests: BTreeMap<String, TestRecord>,
    pub correlations: BTreeMap<String, CorrelationRanking>,
    pub plots: Vec<String>,
    pub data_preview: Vec<PreviewRow>,
}
