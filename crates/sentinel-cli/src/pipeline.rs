//! Source loading and sheet preparation shared by the commands.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use sentinel_engine::{Dataset, normalize};
use sentinel_ingest::{LoadedSheet, SourceBook, load_source};
use sentinel_model::DashboardConfig;
use serde::Serialize;
use tracing::{debug, info_span};

/// One row of the `sheets` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    pub name: String,
    pub rows: usize,
    pub date_field: String,
    pub has_date: bool,
    /// Offered for selection under the current configuration.
    pub visible: bool,
}

/// Load a source, attaching its path to the error.
pub fn open_source(path: &Path) -> Result<SourceBook> {
    load_source(path).with_context(|| format!("load source {}", path.display()))
}

/// Describe every sheet of a source under `config`.
pub fn sheet_overview(book: &SourceBook, config: &DashboardConfig) -> Vec<SheetInfo> {
    let names = book.sheet_names();
    let visible = config.visible_sheets(&names);
    book.sheets
        .iter()
        .map(|sheet| {
            let date_field = config.schema_for(&sheet.name).date;
            SheetInfo {
                name: sheet.name.clone(),
                rows: sheet.data.height(),
                has_date: sheet.data.column(&date_field).is_ok(),
                date_field,
                visible: visible.contains(&sheet.name.as_str()),
            }
        })
        .collect()
}

/// The requested sheet, or the first sheet offered by the configuration.
pub fn select_sheet<'a>(
    book: &'a SourceBook,
    config: &DashboardConfig,
    requested: Option<&str>,
) -> Result<&'a LoadedSheet> {
    if let Some(name) = requested {
        return Ok(book.sheet(name)?);
    }
    let names = book.sheet_names();
    let first = config
        .visible_sheets(&names)
        .first()
        .map(|name| (*name).to_string())
        .ok_or_else(|| anyhow!("source {} has no sheets", book.path.display()))?;
    Ok(book.sheet(&first)?)
}

/// Build the engine dataset for a sheet and normalize its date column.
pub fn prepare_dataset(sheet: &LoadedSheet, config: &DashboardConfig) -> Result<Dataset> {
    let span = info_span!("prepare", sheet = %sheet.name);
    let _guard = span.enter();

    let schema = config.schema_for(&sheet.name);
    let date_field = schema.date.clone();
    let raw = Dataset::new(sheet.name.clone(), sheet.data.clone(), schema);
    let dataset = normalize(&raw, &date_field).context("normalize date column")?;
    debug!(
        rows = dataset.height(),
        dropped = raw.height() - dataset.height(),
        "sheet prepared"
    );
    Ok(dataset)
}
