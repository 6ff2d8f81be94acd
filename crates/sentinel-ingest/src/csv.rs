//! CSV sheet reading.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, PolarsError, SerReader};

use crate::error::{IngestError, Result};

/// Reads a CSV file into a DataFrame with every column kept as text.
///
/// The first row is the header. Dates and categorical codes are interpreted
/// later by the engine, so no type inference happens here.
pub fn read_csv_sheet(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;

    let parse_error = |err: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(SerReader::finish)
        .map_err(parse_error)?;
    tracing::debug!(path = %path.display(), rows = df.height(), columns = df.width(), "CSV read");
    Ok(df)
}

/// Rejects empty files and UTF-16 files. A UTF-8 BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let read_error = |source: std::io::Error| match source.kind() {
        ErrorKind::NotFound => IngestError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
    };

    let mut head = [0u8; 2];
    let mut file = File::open(path).map_err(read_error)?;
    let read = file.read(&mut head).map_err(read_error)?;

    match (read, utf16_byte_order(&head[..read])) {
        (0, _) => Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        }),
        (_, Some(encoding)) => Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding,
        }),
        _ => Ok(()),
    }
}

fn utf16_byte_order(head: &[u8]) -> Option<&'static str> {
    match head {
        [0xFF, 0xFE, ..] => Some("UTF-16 LE"),
        [0xFE, 0xFF, ..] => Some("UTF-16 BE"),
        _ => None,
    }
}
