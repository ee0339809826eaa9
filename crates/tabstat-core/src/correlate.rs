//! Pairwise correlation matrices and top-pair ranking.

use std::collections::BTreeMap;

use tracing::debug;

use tabstat_model::{ColumnClassification, CorrelationPair, CorrelationRanking, Table};

use crate::hypothesis::midranks;

/// How many pairs each ranking keeps.
pub const TOP_PAIRS: usize = 10;

/// Pearson and Spearman rankings over all numeric columns, keyed
/// `pearson` and `spearman`. Empty when fewer than two numeric columns
/// exist. Missing entries are deleted pairwise, per column pair.
pub fn correlations(
    table: &Table,
    classification: &ColumnClassification,
) -> BTreeMap<String, CorrelationRanking> {
    let names = &classification.numeric;
    if names.len() < 2 {
        return BTreeMap::new();
    }
    let columns: Vec<&[Option<f64>]> = names
        .iter()
        .filter_map(|name| table.numeric_values(name))
        .collect();
    if columns.len() < 2 {
        return BTreeMap::new();
    }
    debug!(columns = columns.len(), "ranking correlation pairs");
    let mut rankings = BTreeMap::new();
    rankings.insert(
        "pearson".to_string(),
        rank_pairs(names, &columns, pearson_pair),
    );
    rankings.insert(
        "spearman".to_string(),
        rank_pairs(names, &columns, spearman_pair),
    );
    rankings
}

/// Full Pearson matrix over the named numeric columns: symmetric, unit
/// diagonal. For consumers that need the matrix itself (e.g. heatmap data)
/// rather than ranked pairs.
pub fn pearson_matrix(table: &Table, numeric_cols: &[String]) -> Vec<Vec<f64>> {
    let columns: Vec<&[Option<f64>]> = numeric_cols
        .iter()
        .filter_map(|name| table.numeric_values(name))
        .collect();
    let n = columns.len();
    let mut matrix = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let coefficient = pearson_pair(columns[i], columns[j]);
            matrix[i][j] = coefficient;
            matrix[j][i] = coefficient;
        }
    }
    matrix
}

/// Enumerate each unordered pair once (i < j in column order), sort by
/// descending absolute correlation (stable, so ties keep enumeration
/// order), and keep the strongest [`TOP_PAIRS`].
fn rank_pairs(
    names: &[String],
    columns: &[&[Option<f64>]],
    correlate: fn(&[Option<f64>], &[Option<f64>]) -> f64,
) -> CorrelationRanking {
    let mut pairs = Vec::new();
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            let coefficient = correlate(columns[i], columns[j]);
            pairs.push(CorrelationPair::new(&names[i], &names[j], coefficient));
        }
    }
    pairs.sort_by(|a, b| {
        b.abs_corr
            .partial_cmp(&a.abs_corr)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs.truncate(TOP_PAIRS);
    CorrelationRanking { top_pairs: pairs }
}

/// Rows where both entries are present.
fn pairwise_complete(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip()
}

fn pearson_pair(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (xs, ys) = pairwise_complete(x, y);
    pearson(&xs, &ys)
}

/// Spearman is Pearson over midranks of the pairwise-complete observations.
fn spearman_pair(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (xs, ys) = pairwise_complete(x, y);
    pearson(&midranks(&xs), &midranks(&ys))
}

/// Pearson coefficient; NaN when fewer than two observations or either
/// side has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if x.len() < 2 {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        covariance += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x).powi(2);
        var_y += (b - mean_y).powi(2);
    }
    covariance / (var_x * var_y).sqrt()
}
