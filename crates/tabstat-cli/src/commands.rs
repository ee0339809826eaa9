use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use tabstat_cli::plots::PlotDataExporter;
use tabstat_core::{NullVisualizer, analyze};
use tabstat_ingest::read_table;
use tabstat_model::AnalysisSummary;

use crate::cli::AnalyzeArgs;

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisSummary> {
    let table = read_table(&args.file)
        .with_context(|| format!("read table: {}", args.file.display()))?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "table loaded"
    );
    let summary = if args.no_plots {
        analyze(&table, &NullVisualizer)
    } else {
        let out_dir = args
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("output"));
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("create output dir: {}", out_dir.display()))?;
        analyze(&table, &PlotDataExporter::new(&out_dir))
    }
    .context("analyze table")?;
    Ok(summary)
}
