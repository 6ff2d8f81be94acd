//! Schema descriptors: which source column plays which role.
//!
//! The source spreadsheet has two logical sheets that share the categorical
//! columns but record different dates (registration vs. cancellation). Column
//! names are configuration, so every lookup goes through a [`SheetSchema`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Default column holding the responsible user.
pub const DEFAULT_RESPONSIBLE_FIELD: &str = "Usuário responsável";
/// Default column holding the customer category.
pub const DEFAULT_CATEGORY_FIELD: &str = "Categoria";
/// Default column holding the state (UF).
pub const DEFAULT_STATE_FIELD: &str = "Estado";
/// Default date column for sheets without a profile.
pub const DEFAULT_DATE_FIELD: &str = "Data de cadastro";

/// Logical role of a column in a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Responsible,
    Category,
    State,
    Date,
}

impl FieldRole {
    pub const ALL: [FieldRole; 4] = [
        FieldRole::Responsible,
        FieldRole::Category,
        FieldRole::State,
        FieldRole::Date,
    ];

    /// Roles checked by the incompleteness KPI when no explicit list is configured.
    pub const RELEVANT: [FieldRole; 3] = [
        FieldRole::Responsible,
        FieldRole::Category,
        FieldRole::State,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldRole::Responsible => "responsible",
            FieldRole::Category => "category",
            FieldRole::State => "state",
            FieldRole::Date => "date",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "responsible" | "responsavel" => Ok(FieldRole::Responsible),
            "category" | "categoria" => Ok(FieldRole::Category),
            "state" | "estado" | "region" | "regiao" => Ok(FieldRole::State),
            "date" | "data" => Ok(FieldRole::Date),
            other => Err(ModelError::UnknownFieldRole(other.to_string())),
        }
    }
}

/// Column names shared by every sheet of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub responsible: String,
    pub category: String,
    pub state: String,
    /// Date column used for sheets that have no [`SheetProfile`].
    pub date: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            responsible: DEFAULT_RESPONSIBLE_FIELD.to_string(),
            category: DEFAULT_CATEGORY_FIELD.to_string(),
            state: DEFAULT_STATE_FIELD.to_string(),
            date: DEFAULT_DATE_FIELD.to_string(),
        }
    }
}

/// Per-sheet override of the date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetProfile {
    /// Sheet (or CSV file stem) name, matched exactly.
    pub name: String,
    /// Date column recorded on this sheet.
    pub date_field: String,
}

impl SheetProfile {
    pub fn new(name: impl Into<String>, date_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date_field: date_field.into(),
        }
    }
}

/// Full column mapping for one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSchema {
    pub responsible: String,
    pub category: String,
    pub state: String,
    pub date: String,
}

impl SheetSchema {
    /// Build a schema from the shared field map and an optional sheet profile.
    pub fn from_fields(fields: &FieldMap, profile: Option<&SheetProfile>) -> Self {
        Self {
            responsible: fields.responsible.clone(),
            category: fields.category.clone(),
            state: fields.state.clone(),
            date: profile
                .map(|p| p.date_field.clone())
                .unwrap_or_else(|| fields.date.clone()),
        }
    }

    /// Column name configured for a role.
    pub fn column(&self, role: FieldRole) -> &str {
        match role {
            FieldRole::Responsible => &self.responsible,
            FieldRole::Category => &self.category,
            FieldRole::State => &self.state,
            FieldRole::Date => &self.date,
        }
    }
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self::from_fields(&FieldMap::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_role_parses_aliases() {
        assert_eq!("Category".parse::<FieldRole>(), Ok(FieldRole::Category));
        assert_eq!("estado".parse::<FieldRole>(), Ok(FieldRole::State));
        assert_eq!(" date ".parse::<FieldRole>(), Ok(FieldRole::Date));
        assert_eq!(
            "owner".parse::<FieldRole>(),
            Err(ModelError::UnknownFieldRole("owner".to_string()))
        );
    }

    #[test]
    fn schema_uses_profile_date() {
        let fields = FieldMap::default();
        let profile = SheetProfile::new("CANCELADOS", "Data de saida");
        let schema = SheetSchema::from_fields(&fields, Some(&profile));
        assert_eq!(schema.column(FieldRole::Date), "Data de saida");
        assert_eq!(schema.column(FieldRole::State), "Estado");

        let fallback = SheetSchema::from_fields(&fields, None);
        assert_eq!(fallback.column(FieldRole::Date), DEFAULT_DATE_FIELD);
    }
}
