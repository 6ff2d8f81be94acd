//! Shared utilities for the Data Sentinel crates.
//!
//! Polars `AnyValue` helpers used by ingestion and the metrics engine to read
//! sheet cells as text and decide whether a cell counts as missing.

pub mod polars;

pub use polars::{cell_text, column_text_values, format_numeric, is_missing};
