pub mod error;
pub mod records;
pub mod summary;
pub mod table;

pub use error::{Result, TableError};
pub use records::{CorrelationPair, CorrelationRanking, SIGNIFICANCE_LEVEL, TestRecord};
pub use summary::{AnalysisSummary, BasicInfo, ColumnClassification};
pub use table::{Column, ColumnData, PreviewRow, PreviewValue, Table};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes() {
        let table = Table::new(vec![
            Column::numeric("age", vec![Some(25.0), None]),
            Column::categorical("gender", vec![Some("M".to_string()), Some("F".to_string())]),
        ])
        .expect("valid table");
        let summary = AnalysisSummary {
            basic_info: BasicInfo {
                rows: table.row_count(),
                columns: table.column_count(),
                numeric_cols: vec!["age".to_string()],
                categorical_cols: vec!["gender".to_string()],
                missing_values: [("age".to_string(), 1), ("gender".to_string(), 0)]
                    .into_iter()
                    .collect(),
            },
            statistical_tests: Default::default(),
            correlations: Default::default(),
            plots: vec!["plots/dist_age.json".to_string()],
            data_preview: table.preview(10),
        };
        let json = serde_json::to_string(&summary).expect("serialize summary");
        let round: AnalysisSummary = serde_json::from_str(&json).expect("deserialize summary");
        assert_eq!(round, summary);
    }

    #[test]
    fn missing_preview_value_is_null() {
        let json = serde_json::to_string(&PreviewValue::Missing).expect("serialize");
        assert_eq!(json, "null");
    }
}
