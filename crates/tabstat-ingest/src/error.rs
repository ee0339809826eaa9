use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Table(#[from] tabstat_model::TableError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
