//! Dashboard configuration.
//!
//! Stored as TOML:
//!
//! ```toml
//! [fields]
//! responsible = "Usuário responsável"
//! category = "Categoria"
//! state = "Estado"
//!
//! [[sheets]]
//! name = "CANCELADOS"
//! date_field = "Data de saida"
//!
//! [kpi]
//! growth_period = "weekly"
//! ```

use serde::{Deserialize, Serialize};

use crate::fields::{FieldMap, SheetProfile, SheetSchema};
use crate::kpi::KpiSettings;

/// Sheets shown by default and the date column each one records.
pub const DEFAULT_SHEETS: [(&str, &str); 2] = [
    ("ATIVOS PF E PJ", "Data de cadastro"),
    ("CANCELADOS", "Data de saida"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub fields: FieldMap,
    pub sheets: Vec<SheetProfile>,
    pub kpi: KpiSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            fields: FieldMap::default(),
            sheets: DEFAULT_SHEETS
                .iter()
                .map(|(name, date)| SheetProfile::new(*name, *date))
                .collect(),
            kpi: KpiSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Profile configured for a sheet, if any.
    pub fn profile_for(&self, sheet: &str) -> Option<&SheetProfile> {
        self.sheets.iter().find(|profile| profile.name == sheet)
    }

    /// Column mapping for a sheet.
    pub fn schema_for(&self, sheet: &str) -> SheetSchema {
        SheetSchema::from_fields(&self.fields, self.profile_for(sheet))
    }

    /// Sheets offered for selection.
    ///
    /// Configured sheets that exist in the source come first, in configuration
    /// order. When none of them exist every available sheet is offered.
    pub fn visible_sheets<'a>(&self, available: &'a [String]) -> Vec<&'a str> {
        let configured: Vec<&str> = self
            .sheets
            .iter()
            .filter_map(|profile| {
                available
                    .iter()
                    .find(|name| **name == profile.name)
                    .map(String::as_str)
            })
            .collect();
        if configured.is_empty() {
            available.iter().map(String::as_str).collect()
        } else {
            configured
        }
    }
}
