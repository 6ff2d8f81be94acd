//! Loading a whole source into named sheets.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::csv::read_csv_sheet;
use crate::discovery::{SourceKind, list_csv_files, sheet_name_for};
use crate::error::{IngestError, Result};
use crate::workbook::read_workbook;

/// One sheet of a source.
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub name: String,
    pub data: DataFrame,
}

/// Every readable sheet of a source, in source order.
#[derive(Debug, Clone)]
pub struct SourceBook {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub sheets: Vec<LoadedSheet>,
}

impl SourceBook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&LoadedSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Look up a sheet, failing with the list of available names.
    pub fn sheet(&self, name: &str) -> Result<&LoadedSheet> {
        self.get(name).ok_or_else(|| IngestError::SheetNotFound {
            name: name.to_string(),
            available: self.sheet_names().join(", "),
        })
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Loads a CSV file, a folder of CSV files, or a workbook.
///
/// A CSV file becomes one sheet named after its file stem. In a folder, CSV
/// files that fail to parse are skipped with a warning, like unreadable
/// worksheets in a workbook. A source with no readable sheet is an error.
pub fn load_source(path: &Path) -> Result<SourceBook> {
    let kind = SourceKind::detect(path)?;
    let sheets = match kind {
        SourceKind::Csv => vec![LoadedSheet {
            name: sheet_name_for(path),
            data: read_csv_sheet(path)?,
        }],
        SourceKind::Directory => {
            let mut sheets = Vec::new();
            for file in list_csv_files(path)? {
                match read_csv_sheet(&file) {
                    Ok(data) => sheets.push(LoadedSheet {
                        name: sheet_name_for(&file),
                        data,
                    }),
                    Err(e) => warn!(path = %file.display(), error = %e, "skipping unreadable CSV"),
                }
            }
            sheets
        }
        SourceKind::Workbook => read_workbook(path)?
            .into_iter()
            .map(|(name, data)| LoadedSheet { name, data })
            .collect(),
    };

    if sheets.is_empty() {
        return Err(IngestError::NoSheets {
            path: path.to_path_buf(),
        });
    }
    info!(
        path = %path.display(),
        sheets = sheets.len(),
        rows = sheets.iter().map(|sheet| sheet.data.height()).sum::<usize>(),
        "source loaded"
    );
    Ok(SourceBook {
        path: path.to_path_buf(),
        kind,
        sheets,
    })
}
