//! Orchestration: classify once, run every component, merge the summary.

use std::collections::BTreeMap;

use tracing::debug;

use tabstat_model::{AnalysisSummary, BasicInfo, Table};

use crate::classify::classify;
use crate::correlate::correlations;
use crate::error::Result;
use crate::stats::run_statistics;
use crate::visualize::Visualizer;

/// Rows included in the data preview.
pub const PREVIEW_ROWS: usize = 10;

/// Analyze a table end to end. The classification is computed once and
/// passed to every component. Computation failures from the test runner
/// propagate unmodified; the correlation ranker and the classifier cannot
/// fail.
pub fn analyze(table: &Table, visualizer: &dyn Visualizer) -> Result<AnalysisSummary> {
    let classification = classify(table);
    debug!(
        rows = table.row_count(),
        numeric = classification.numeric.len(),
        categorical = classification.categorical.len(),
        "analyzing table"
    );
    let statistical_tests = run_statistics(table, &classification)?;
    let correlations = correlations(table, &classification);
    let missing_values: BTreeMap<String, usize> = table
        .columns()
        .iter()
        .map(|column| (column.name.clone(), column.data.missing_count()))
        .collect();
    let plots = visualizer.render(table, &classification.numeric);
    Ok(AnalysisSummary {
        basic_info: BasicInfo {
            rows: table.row_count(),
            columns: table.column_count(),
            numeric_cols: classification.numeric,
            categorical_cols: classification.categorical,
            missing_values,
        },
        statistical_tests,
        correlations,
        plots,
        data_preview: table.preview(PREVIEW_ROWS),
    })
}
