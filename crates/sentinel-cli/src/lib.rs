//! CLI library components for Data Sentinel.

pub mod logging;
pub mod pipeline;
pub mod summary;
