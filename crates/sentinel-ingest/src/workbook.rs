//! Spreadsheet workbook reading through calamine.
//!
//! Every cell is converted to text (or null when empty) so sheets from
//! workbooks and CSV files reach the engine in the same shape. Excel date cells
//! become ISO strings.

use std::collections::HashSet;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDateTime, NaiveTime};
use polars::prelude::{Column, DataFrame};
use sentinel_common::format_numeric;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Reads every worksheet of a workbook, in workbook order.
///
/// Worksheets that cannot be read are skipped with a warning.
pub fn read_workbook(path: &Path) -> Result<Vec<(String, DataFrame)>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                warn!(path = %path.display(), sheet = %name, error = %e, "skipping unreadable sheet");
                continue;
            }
        };
        match range_to_frame(&range) {
            Ok(df) => {
                debug!(sheet = %name, rows = df.height(), columns = df.width(), "sheet loaded");
                sheets.push((name, df));
            }
            Err(e) => {
                warn!(path = %path.display(), sheet = %name, error = %e, "skipping malformed sheet");
            }
        }
    }
    Ok(sheets)
}

/// Converts a cell range into a text DataFrame.
///
/// The first row is the header. Rows whose cells are all empty are dropped.
pub fn range_to_frame(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names = header_names(header);

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        let cells: Vec<Option<String>> = (0..names.len())
            .map(|idx| row.get(idx).and_then(cell_text))
            .collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        for (column, cell) in values.iter_mut().zip(cells) {
            column.push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, cells)| Column::new(name.into(), cells))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Header texts, with blanks named by position and duplicates suffixed.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_text(cell)
                .map(|text| text.trim().to_string())
                .unwrap_or_else(|| format!("column_{}", idx + 1));
            let mut name = base.clone();
            let mut suffix = 2;
            while !seen.insert(name.clone()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Text form of a cell, `None` for empty, blank and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => (!s.trim().is_empty()).then(|| s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map_or_else(|| format_numeric(dt.as_f64()), format_datetime),
        ),
        other => Some(other.to_string()),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
