//! Normalized result records for statistical tests and correlations.

use serde::{Deserialize, Serialize};

/// Significance threshold applied to every test record.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Round to four decimal places, the precision stored in every record.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Result of one statistical test.
///
/// Construct through [`TestRecord::from_raw`]: statistic and p-value are
/// rounded to four decimals and `significant` is derived from the raw
/// p-value, never set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub test: String,
    pub variables: String,
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl TestRecord {
    pub fn from_raw(
        test: impl Into<String>,
        var1: &str,
        var2: Option<&str>,
        statistic: f64,
        p_value: f64,
    ) -> Self {
        let variables = match var2 {
            Some(var2) if !var2.is_empty() => format!("{var1} vs {var2}"),
            _ => var1.to_string(),
        };
        Self {
            test: test.into(),
            variables,
            statistic: round4(statistic),
            p_value: round4(p_value),
            significant: p_value < SIGNIFICANCE_LEVEL,
        }
    }
}

/// One unordered pair of numeric columns and their correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub var1: String,
    pub var2: String,
    pub correlation: f64,
    pub abs_corr: f64,
}

impl CorrelationPair {
    pub fn new(var1: impl Into<String>, var2: impl Into<String>, correlation: f64) -> Self {
        let rounded = round4(correlation);
        Self {
            var1: var1.into(),
            var2: var2.into(),
            correlation: rounded,
            abs_corr: rounded.abs(),
        }
    }
}

/// Strongest-magnitude pairs for one correlation method, descending by
/// absolute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRanking {
    pub top_pairs: Vec<CorrelationPair>,
}
