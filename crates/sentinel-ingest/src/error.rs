//! Error types for data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a source or its configuration.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported source format.
    #[error("unsupported source format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// File uses an encoding the CSV reader cannot handle.
    #[error("unsupported encoding {encoding} in {path}, save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file is empty.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Workbook Errors ===
    /// Failed to open or read a workbook.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Source contains no readable sheet.
    #[error("no readable sheet in {path}")]
    NoSheets { path: PathBuf },

    /// Requested sheet is not in the source.
    #[error("sheet '{name}' not found, available: {available}")]
    SheetNotFound { name: String, available: String },

    // === Configuration Errors ===
    /// Configuration file could not be parsed or written.
    #[error("invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
