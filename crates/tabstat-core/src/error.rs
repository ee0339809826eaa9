use thiserror::Error;

use crate::hypothesis::StatError;

/// Engine failures. Structural absence of columns or groups is never an
/// error; it skips the affected test family instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{test} failed for {variables}: {source}")]
    Computation {
        test: String,
        variables: String,
        #[source]
        source: StatError,
    },
}

impl AnalysisError {
    pub(crate) fn computation(test: &str, variables: impl Into<String>, source: StatError) -> Self {
        Self::Computation {
            test: test.to_string(),
            variables: variables.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
