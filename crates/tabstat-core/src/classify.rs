//! Schema classification: partition columns into numeric and categorical.

use tabstat_model::{ColumnClassification, Table};

/// Partition the table's columns by type, preserving column order. Pure;
/// an empty table yields two empty lists.
pub fn classify(table: &Table) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    for column in table.columns() {
        if column.is_numeric() {
            classification.numeric.push(column.name.clone());
        } else {
            classification.categorical.push(column.name.clone());
        }
    }
    classification
}
