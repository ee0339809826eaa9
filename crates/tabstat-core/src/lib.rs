//! Automatic statistical analysis of tabular data with unknown schema.
//!
//! Given only a [`Table`](tabstat_model::Table), the engine classifies its
//! columns, decides which of six statistical tests apply, runs them, ranks
//! pairwise correlations, and merges everything into one
//! [`AnalysisSummary`](tabstat_model::AnalysisSummary). No analysis plan,
//! test configuration, or assumption checking is involved.

pub mod analyze;
pub mod classify;
pub mod correlate;
pub mod error;
pub mod hypothesis;
pub mod stats;
pub mod visualize;

pub use analyze::{PREVIEW_ROWS, analyze};
pub use classify::classify;
pub use correlate::{TOP_PAIRS, correlations, pearson_matrix};
pub use error::{AnalysisError, Result};
pub use hypothesis::{StatError, TestOutcome};
pub use stats::run_statistics;
pub use visualize::{NullVisualizer, Visualizer};
