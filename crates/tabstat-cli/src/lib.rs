//! CLI library components for tabstat.

pub mod logging;
pub mod plots;
