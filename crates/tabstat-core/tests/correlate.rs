//! Ranking behavior of the correlation ranker.

use tabstat_core::{TOP_PAIRS, classify, correlations};
use tabstat_model::{Column, Table};

fn numeric(name: &str, values: &[f64]) -> Column {
    Column::numeric(name, values.iter().map(|v| Some(*v)).collect())
}

#[test]
fn fewer_than_two_numeric_columns_yields_empty_mapping() {
    let table = Table::new(vec![
        numeric("x", &[1.0, 2.0, 3.0]),
        Column::categorical("g", vec![None, None, None]),
    ])
    .expect("valid table");
    assert!(correlations(&table, &classify(&table)).is_empty());
}

#[test]
fn both_methods_are_reported() {
    let table = Table::new(vec![
        numeric("a", &[1.0, 2.0, 3.0, 4.0]),
        numeric("b", &[2.0, 4.0, 6.0, 8.0]),
    ])
    .expect("valid table");
    let rankings = correlations(&table, &classify(&table));
    let keys: Vec<&str> = rankings.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["pearson", "spearman"]);
    for ranking in rankings.values() {
        assert_eq!(ranking.top_pairs.len(), 1);
        assert_eq!(ranking.top_pairs[0].var1, "a");
        assert_eq!(ranking.top_pairs[0].var2, "b");
        assert!((ranking.top_pairs[0].correlation - 1.0).abs() < 1e-9);
    }
}

#[test]
fn pairs_are_capped_and_sorted_descending() {
    // Six columns give 15 pairs; only the 10 strongest survive.
    let base: Vec<f64> = (0..20).map(f64::from).collect();
    let mut columns = Vec::new();
    for (i, noise) in [0.0, 0.3, 0.9, 2.5, 7.0, 20.0].iter().enumerate() {
        let values: Vec<f64> = base
            .iter()
            .enumerate()
            .map(|(row, v)| v + noise * ((row * 7 % 5) as f64 - 2.0))
            .collect();
        columns.push(numeric(&format!("c{i}"), &values));
    }
    let table = Table::new(columns).expect("valid table");
    let rankings = correlations(&table, &classify(&table));
    for ranking in rankings.values() {
        assert_eq!(ranking.top_pairs.len(), TOP_PAIRS);
        for window in ranking.top_pairs.windows(2) {
            assert!(window[0].abs_corr >= window[1].abs_corr);
        }
    }
}

#[test]
fn no_pair_appears_twice() {
    let table = Table::new(vec![
        numeric("a", &[1.0, 5.0, 2.0, 8.0]),
        numeric("b", &[3.0, 1.0, 4.0, 1.0]),
        numeric("c", &[2.0, 2.0, 6.0, 7.0]),
    ])
    .expect("valid table");
    let rankings = correlations(&table, &classify(&table));
    for ranking in rankings.values() {
        assert_eq!(ranking.top_pairs.len(), 3);
        let mut seen = std::collections::BTreeSet::new();
        for pair in &ranking.top_pairs {
            assert!(seen.insert((pair.var1.clone(), pair.var2.clone())));
            assert_ne!(pair.var1, pair.var2);
        }
    }
}

#[test]
fn missing_values_do_not_remove_the_pair() {
    let table = Table::new(vec![
        numeric("a", &[1.0, 2.0, 3.0, 4.0]),
        Column::numeric("b", vec![Some(10.0), None, Some(30.0), Some(40.0)]),
    ])
    .expect("valid table");
    let rankings = correlations(&table, &classify(&table));
    let pearson = &rankings["pearson"].top_pairs;
    assert_eq!(pearson.len(), 1);
    assert!((pearson[0].correlation - 1.0).abs() < 1e-9);
}
