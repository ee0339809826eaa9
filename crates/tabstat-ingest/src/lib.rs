pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::read_table;
