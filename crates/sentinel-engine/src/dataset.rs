//! Sheet frames with their resolved column mapping.

use std::collections::BTreeMap;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use sentinel_model::{FieldRole, SheetSchema};

use crate::error::Result;

/// One sheet of the source, ready for the engine.
///
/// Wraps the Polars frame together with the sheet name and the column mapping.
/// Which roles are actually present is resolved once here, so later lookups by
/// role never probe the frame again.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    data: DataFrame,
    schema: SheetSchema,
    present: BTreeMap<FieldRole, String>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, data: DataFrame, schema: SheetSchema) -> Self {
        let present = FieldRole::ALL
            .into_iter()
            .filter_map(|role| {
                let column = schema.column(role);
                data.column(column)
                    .is_ok()
                    .then(|| (role, column.to_string()))
            })
            .collect();
        Self {
            name: name.into(),
            data,
            schema,
            present,
        }
    }

    /// Same sheet and schema over different rows.
    pub(crate) fn with_data(&self, data: DataFrame) -> Self {
        Self::new(self.name.clone(), data, self.schema.clone())
    }

    /// Keep the rows whose mask entry is true, in their original order.
    pub(crate) fn retain(&self, keep: &[bool]) -> Result<Self> {
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        Ok(self.with_data(self.data.filter(&mask)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }

    pub fn schema(&self) -> &SheetSchema {
        &self.schema
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Column playing `role`, if the sheet has it.
    pub fn column(&self, role: FieldRole) -> Option<&str> {
        self.present.get(&role).map(String::as_str)
    }

    /// Configured date column of the sheet, if present.
    pub fn date_column(&self) -> Option<&str> {
        self.column(FieldRole::Date)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn resolves_present_roles_once() {
        let data = DataFrame::new(vec![
            Column::new("Categoria".into(), ["PF", "PJ"]),
            Column::new("Data de cadastro".into(), ["2024-01-01", "2024-01-02"]),
        ])
        .unwrap();
        let dataset = Dataset::new("ATIVOS PF E PJ", data, SheetSchema::default());

        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.column(FieldRole::Category), Some("Categoria"));
        assert_eq!(dataset.date_column(), Some("Data de cadastro"));
        assert_eq!(dataset.column(FieldRole::State), None);
        assert!(dataset.has_field("Categoria"));
        assert!(!dataset.has_field("Estado"));
    }
}
