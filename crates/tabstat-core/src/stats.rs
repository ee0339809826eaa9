//! Test selection and execution.
//!
//! Up to three test families (six tests) run, each gated only by structural
//! availability
//! of columns and groups. Column selection is deliberately positional: the
//! first columns of the required type in declared order, never "the most
//! relevant" ones. An unmet precondition silently skips the family; a
//! numerically degenerate input surfaces as
//! [`AnalysisError::Computation`](crate::error::AnalysisError).

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;

use tabstat_model::{ColumnClassification, Table, TestRecord};

use crate::error::{AnalysisError, Result};
use crate::hypothesis::{
    chi_square_independence, fisher_exact, mann_whitney_u, one_way_anova, students_t_test,
    wilcoxon_signed_rank,
};

/// Run every applicable test family and return the normalized records,
/// keyed `t_test`, `mann_whitney`, `wilcoxon`, `anova`, `chi_square`,
/// `fisher`. The map may be empty.
pub fn run_statistics(
    table: &Table,
    classification: &ColumnClassification,
) -> Result<BTreeMap<String, TestRecord>> {
    let mut results = BTreeMap::new();
    run_two_sample_family(table, classification, &mut results)?;
    run_group_comparison(table, classification, &mut results)?;
    run_categorical_association(table, classification, &mut results)?;
    Ok(results)
}

fn drop_missing(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// T-test, Mann-Whitney U, and Wilcoxon signed-rank on the first two
/// numeric columns. The Wilcoxon pairing truncates both samples to the
/// shorter length by position; unmatched tail values are discarded.
fn run_two_sample_family(
    table: &Table,
    classification: &ColumnClassification,
    results: &mut BTreeMap<String, TestRecord>,
) -> Result<()> {
    let [first, second, ..] = classification.numeric.as_slice() else {
        return Ok(());
    };
    let (Some(raw_a), Some(raw_b)) = (table.numeric_values(first), table.numeric_values(second))
    else {
        return Ok(());
    };
    let a = drop_missing(raw_a);
    let b = drop_missing(raw_b);
    debug!(var1 = %first, var2 = %second, "running two-sample numeric comparison");
    let pair = format!("{first} vs {second}");

    let outcome = students_t_test(&a, &b)
        .map_err(|e| AnalysisError::computation("T-Test (Independent)", pair.clone(), e))?;
    results.insert(
        "t_test".to_string(),
        TestRecord::from_raw(
            "T-Test (Independent)",
            first,
            Some(second),
            outcome.statistic,
            outcome.p_value,
        ),
    );

    let outcome = mann_whitney_u(&a, &b)
        .map_err(|e| AnalysisError::computation("Mann-Whitney U", pair.clone(), e))?;
    results.insert(
        "mann_whitney".to_string(),
        TestRecord::from_raw(
            "Mann-Whitney U",
            first,
            Some(second),
            outcome.statistic,
            outcome.p_value,
        ),
    );

    let size = a.len().min(b.len());
    let outcome = wilcoxon_signed_rank(&a[..size], &b[..size])
        .map_err(|e| AnalysisError::computation("Wilcoxon Signed Rank", pair, e))?;
    results.insert(
        "wilcoxon".to_string(),
        TestRecord::from_raw(
            "Wilcoxon Signed Rank",
            first,
            Some(second),
            outcome.statistic,
            outcome.p_value,
        ),
    );
    Ok(())
}

/// One-way ANOVA of the first numeric column grouped by the first
/// categorical column. Groups follow first-appearance order of the
/// category values; at least two non-empty groups must remain.
fn run_group_comparison(
    table: &Table,
    classification: &ColumnClassification,
    results: &mut BTreeMap<String, TestRecord>,
) -> Result<()> {
    let (Some(num_col), Some(cat_col)) = (
        classification.numeric.first(),
        classification.categorical.first(),
    ) else {
        return Ok(());
    };
    let (Some(numeric), Some(categories)) = (
        table.numeric_values(num_col),
        table.categorical_values(cat_col),
    ) else {
        return Ok(());
    };

    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    for value in categories.iter().flatten() {
        if seen.insert(value.as_str()) {
            order.push(value);
        }
    }
    let mut groups = Vec::new();
    for label in order {
        let group: Vec<f64> = numeric
            .iter()
            .zip(categories)
            .filter_map(|(value, category)| match (value, category) {
                (Some(value), Some(category)) if category == label => Some(*value),
                _ => None,
            })
            .collect();
        if !group.is_empty() {
            groups.push(group);
        }
    }
    if groups.len() < 2 {
        return Ok(());
    }
    let description = format!("{num_col} grouped by {cat_col}");
    debug!(groups = groups.len(), %description, "running group comparison");
    let outcome = one_way_anova(&groups)
        .map_err(|e| AnalysisError::computation("ANOVA", description.clone(), e))?;
    results.insert(
        "anova".to_string(),
        TestRecord::from_raw("ANOVA", &description, None, outcome.statistic, outcome.p_value),
    );
    Ok(())
}

/// Chi-square independence (and, for 2x2 tables, Fisher's exact test) on
/// the contingency table of the first two categorical columns.
fn run_categorical_association(
    table: &Table,
    classification: &ColumnClassification,
    results: &mut BTreeMap<String, TestRecord>,
) -> Result<()> {
    let [col1, col2, ..] = classification.categorical.as_slice() else {
        return Ok(());
    };
    let (Some(rows), Some(cols)) = (
        table.categorical_values(col1),
        table.categorical_values(col2),
    ) else {
        return Ok(());
    };
    let counts = contingency_counts(rows, cols);
    let shape = (counts.len(), counts.first().map_or(0, Vec::len));
    let pair = format!("{col1} vs {col2}");

    if shape.0 >= 2 && shape.1 >= 2 {
        debug!(rows = shape.0, cols = shape.1, %pair, "running chi-square independence");
        let observed: Vec<Vec<f64>> = counts
            .iter()
            .map(|row| row.iter().map(|&v| v as f64).collect())
            .collect();
        let outcome = chi_square_independence(&observed)
            .map_err(|e| AnalysisError::computation("Chi-Square", pair.clone(), e))?;
        results.insert(
            "chi_square".to_string(),
            TestRecord::from_raw(
                "Chi-Square",
                col1,
                Some(col2),
                outcome.statistic,
                outcome.p_value,
            ),
        );
    }

    if shape == (2, 2) {
        let table2 = [
            [counts[0][0], counts[0][1]],
            [counts[1][0], counts[1][1]],
        ];
        let outcome = fisher_exact(table2)
            .map_err(|e| AnalysisError::computation("Fisher Exact Test", pair, e))?;
        results.insert(
            "fisher".to_string(),
            TestRecord::from_raw(
                "Fisher Exact Test",
                col1,
                Some(col2),
                outcome.statistic,
                outcome.p_value,
            ),
        );
    }
    Ok(())
}

/// Cross-tabulate co-occurrence counts of two categorical columns, counting
/// only rows where both values are present, then prune all-zero rows and
/// columns. Labels are sorted lexicographically on both axes.
fn contingency_counts(a: &[Option<String>], b: &[Option<String>]) -> Vec<Vec<u64>> {
    let row_labels: BTreeSet<&str> = a.iter().flatten().map(String::as_str).collect();
    let col_labels: BTreeSet<&str> = b.iter().flatten().map(String::as_str).collect();
    let row_index: BTreeMap<&str, usize> = row_labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label, i))
        .collect();
    let col_index: BTreeMap<&str, usize> = col_labels
        .into_iter()
        .enumerate()
        .map(|(j, label)| (label, j))
        .collect();
    let mut counts = vec![vec![0u64; col_index.len()]; row_index.len()];
    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y)
            && let (Some(&i), Some(&j)) = (row_index.get(x.as_str()), col_index.get(y.as_str()))
        {
            counts[i][j] += 1;
        }
    }
    let col_count = counts.first().map_or(0, Vec::len);
    let keep_cols: Vec<usize> = (0..col_count)
        .filter(|&j| counts.iter().any(|row| row[j] != 0))
        .collect();
    counts
        .into_iter()
        .filter(|row| row.iter().any(|&v| v != 0))
        .map(|row| keep_cols.iter().map(|&j| row[j]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(values: &[Option<&str>]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn contingency_drops_rows_with_missing_values() {
        let a = cat(&[Some("x"), Some("y"), None, Some("x")]);
        let b = cat(&[Some("p"), Some("q"), Some("p"), None]);
        let counts = contingency_counts(&a, &b);
        // Only (x,p) and (y,q) co-occur.
        assert_eq!(counts, vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn contingency_prunes_all_zero_rows() {
        // "z" only appears where the other column is missing, so its row is
        // all zeros and must be pruned.
        let a = cat(&[Some("x"), Some("y"), Some("z"), Some("x"), Some("y")]);
        let b = cat(&[Some("p"), Some("q"), None, Some("q"), Some("p")]);
        let counts = contingency_counts(&a, &b);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0], vec![1, 1]);
        assert_eq!(counts[1], vec![1, 1]);
    }
}
