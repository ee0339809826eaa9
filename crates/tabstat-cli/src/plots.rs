//! Plot-data export: the CLI's visualization collaborator.
//!
//! Rendering itself is out of scope for the engine, so the exporter writes
//! plot-ready JSON artifacts (histogram bins per numeric column, plus the
//! Pearson matrix when more than one numeric column exists) and hands the
//! relative paths back to the orchestrator as opaque references.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use tabstat_core::{Visualizer, pearson_matrix};
use tabstat_model::Table;

/// At most this many histogram artifacts are written.
pub const MAX_HISTOGRAMS: usize = 6;
/// Bin count per histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Writes plot data under `<out_dir>/plots/`.
#[derive(Debug, Clone)]
pub struct PlotDataExporter {
    out_dir: PathBuf,
}

impl PlotDataExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    fn write_artifact<T: Serialize>(&self, relative: &str, artifact: &T) -> Option<String> {
        let path = self.out_dir.join(relative);
        let json = match serde_json::to_vec_pretty(artifact) {
            Ok(json) => json,
            Err(error) => {
                warn!(%relative, %error, "skipping plot artifact");
                return None;
            }
        };
        if let Err(error) = fs::write(&path, json) {
            warn!(path = %path.display(), %error, "skipping plot artifact");
            return None;
        }
        Some(relative.to_string())
    }
}

impl Visualizer for PlotDataExporter {
    fn render(&self, table: &Table, numeric_cols: &[String]) -> Vec<String> {
        let plots_dir = self.out_dir.join("plots");
        if let Err(error) = fs::create_dir_all(&plots_dir) {
            warn!(path = %plots_dir.display(), %error, "cannot create plots directory");
            return Vec::new();
        }
        let mut references = Vec::new();
        for name in numeric_cols.iter().take(MAX_HISTOGRAMS) {
            let Some(values) = table.numeric_values(name) else {
                continue;
            };
            let observed: Vec<f64> = values.iter().flatten().copied().collect();
            if observed.is_empty() {
                continue;
            }
            let artifact = Histogram::new(name, &observed);
            let relative = format!("plots/dist_{}.json", sanitize(name));
            references.extend(self.write_artifact(&relative, &artifact));
        }
        if numeric_cols.len() > 1 {
            let artifact = CorrelationMatrix {
                columns: numeric_cols,
                values: pearson_matrix(table, numeric_cols),
            };
            references.extend(self.write_artifact("plots/correlation_matrix.json", &artifact));
        }
        references
    }
}

/// Keep artifact file names path-safe regardless of column naming.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct Histogram<'a> {
    column: &'a str,
    bins: Vec<Bin>,
}

#[derive(Debug, Serialize)]
struct Bin {
    start: f64,
    end: f64,
    count: usize,
}

impl<'a> Histogram<'a> {
    fn new(column: &'a str, observed: &[f64]) -> Self {
        let min = observed.iter().copied().fold(f64::INFINITY, f64::min);
        let max = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            return Self {
                column,
                bins: vec![Bin {
                    start: min,
                    end: max,
                    count: observed.len(),
                }],
            };
        }
        let width = (max - min) / HISTOGRAM_BINS as f64;
        let mut bins: Vec<Bin> = (0..HISTOGRAM_BINS)
            .map(|i| Bin {
                start: min + width * i as f64,
                end: min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for &value in observed {
            let index = (((value - min) / width) as usize).min(HISTOGRAM_BINS - 1);
            bins[index].count += 1;
        }
        Self { column, bins }
    }
}

#[derive(Debug, Serialize)]
struct CorrelationMatrix<'a> {
    columns: &'a [String],
    values: Vec<Vec<f64>>,
}
