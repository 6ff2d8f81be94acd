//! Source discovery: what kind of source a path is, and the CSV files in a folder.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Workbook extensions read through calamine.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Layout of a source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A single CSV file, read as one sheet.
    Csv,
    /// A folder whose CSV files are the sheets.
    Directory,
    /// A spreadsheet workbook whose worksheets are the sheets.
    Workbook,
}

impl SourceKind {
    /// Classify a path by its file type and extension.
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(SourceKind::Directory);
        }
        if !path.exists() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if is_csv(path) {
            Ok(SourceKind::Csv)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SourceKind::Workbook)
        } else {
            Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    }
}

/// CSV files directly inside `dir`, ordered by file name.
///
/// Subfolders are ignored even when their name ends in `.csv`.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source: std::io::Error| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = std::fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|entry| entry.path()).map_err(read_error))
        .filter(|path| path.as_ref().map_or(true, |path| path.is_file() && is_csv(path)))
        .collect::<Result<Vec<_>>>()?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Sheet name for a CSV file: its file stem.
pub fn sheet_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
