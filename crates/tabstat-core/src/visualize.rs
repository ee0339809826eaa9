//! Seam for the external visualization collaborator.

use tabstat_model::Table;

/// Produces rendered artifacts for a table's numeric columns and returns
/// opaque references to them (typically relative paths). The engine stores
/// the references without interpreting them.
pub trait Visualizer {
    fn render(&self, table: &Table, numeric_cols: &[String]) -> Vec<String>;
}

/// Renders nothing. Useful for headless analysis and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn render(&self, _table: &Table, _numeric_cols: &[String]) -> Vec<String> {
        Vec::new()
    }
}
