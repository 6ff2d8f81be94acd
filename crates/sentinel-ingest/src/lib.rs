//! Data loading for the Data Sentinel dashboard.
//!
//! This crate reads the customer spreadsheet into Polars DataFrames, one per
//! sheet, and loads the dashboard configuration.
//!
//! # Features
//!
//! - **CSV Loading**: a single file, or every CSV file in a folder
//! - **Workbooks**: every worksheet of an xlsx/xlsm/xlsb/xls/ods file
//! - **Configuration**: TOML dashboard configuration with defaults
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sentinel_ingest::{load_config, load_source};
//!
//! let config = load_config(Path::new("sentinel.toml"))?;
//! let book = load_source(Path::new("base_clientes.xlsx"))?;
//! for name in config.visible_sheets(&book.sheet_names()) {
//!     println!("{name}: {} rows", book.sheet(name)?.data.height());
//! }
//! ```

mod config;
mod csv;
mod discovery;
mod error;
mod source;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Source Loading ===
pub use csv::{read_csv_sheet, validate_encoding};
pub use discovery::{SourceKind, WORKBOOK_EXTENSIONS, list_csv_files, sheet_name_for};
pub use source::{LoadedSheet, SourceBook, load_source};
pub use workbook::{range_to_frame, read_workbook};

// === Configuration ===
pub use config::{config_to_toml, default_config_path, load_config, save_config};
