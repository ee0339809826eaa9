//! Integration tests for the plot-data exporter.

use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use tabstat_cli::plots::{HISTOGRAM_BINS, MAX_HISTOGRAMS, PlotDataExporter};
use tabstat_core::{Visualizer, analyze};
use tabstat_model::{Column, Table};

fn numeric(name: &str, values: Vec<f64>) -> Column {
    Column::numeric(name, values.into_iter().map(Some).collect())
}

#[test]
fn exporter_writes_histograms_and_matrix() {
    let dir = tempdir().unwrap();
    let table = Table::new(vec![
        numeric("age", vec![25.0, 30.0, 35.0, 40.0, 45.0]),
        numeric("height", vec![160.0, 165.0, 170.0, 175.0, 180.0]),
    ])
    .unwrap();
    let exporter = PlotDataExporter::new(dir.path());

    let references = exporter.render(&table, &["age".to_string(), "height".to_string()]);

    assert_eq!(
        references,
        vec![
            "plots/dist_age.json".to_string(),
            "plots/dist_height.json".to_string(),
            "plots/correlation_matrix.json".to_string(),
        ]
    );
    for reference in &references {
        assert!(dir.path().join(reference).is_file());
    }

    let raw = fs::read_to_string(dir.path().join("plots/dist_age.json")).unwrap();
    let histogram: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(histogram["column"], "age");
    assert_eq!(histogram["bins"].as_array().unwrap().len(), HISTOGRAM_BINS);

    let raw = fs::read_to_string(dir.path().join("plots/correlation_matrix.json")).unwrap();
    let matrix: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(matrix["columns"], serde_json::json!(["age", "height"]));
    let values = matrix["values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    // Perfectly linear columns correlate at 1.
    assert!((values[0][1].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn exporter_caps_histograms_and_skips_matrix_for_one_column() {
    let dir = tempdir().unwrap();
    let columns: Vec<Column> = (0..8)
        .map(|i| numeric(&format!("col{i}"), vec![1.0, 2.0, f64::from(i)]))
        .collect();
    let names: Vec<String> = (0..8).map(|i| format!("col{i}")).collect();
    let table = Table::new(columns).unwrap();
    let exporter = PlotDataExporter::new(dir.path());

    let references = exporter.render(&table, &names);
    let histograms = references
        .iter()
        .filter(|r| r.starts_with("plots/dist_"))
        .count();
    assert_eq!(histograms, MAX_HISTOGRAMS);
    assert!(references.contains(&"plots/correlation_matrix.json".to_string()));

    let dir = tempdir().unwrap();
    let table = Table::new(vec![numeric("only", vec![1.0, 2.0, 3.0])]).unwrap();
    let exporter = PlotDataExporter::new(dir.path());
    let references = exporter.render(&table, &["only".to_string()]);
    assert_eq!(references, vec!["plots/dist_only.json".to_string()]);
    assert!(!dir.path().join("plots/correlation_matrix.json").exists());
}

#[test]
fn analyze_records_exported_references_in_summary() {
    let dir = tempdir().unwrap();
    let table = Table::new(vec![
        numeric("x", vec![1.0, 2.0, 3.0, 4.0]),
        numeric("y", vec![2.0, 4.0, 6.0, 8.0]),
        Column::categorical(
            "group",
            vec![
                Some("a".to_string()),
                Some("a".to_string()),
                Some("b".to_string()),
                Some("b".to_string()),
            ],
        ),
    ])
    .unwrap();

    let summary = analyze(&table, &PlotDataExporter::new(dir.path())).unwrap();

    assert_eq!(summary.plots.len(), 3);
    for reference in &summary.plots {
        assert!(dir.path().join(reference).is_file());
    }
}
