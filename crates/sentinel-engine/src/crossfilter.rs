//! Chart selections applied on top of the sidebar filter.

use chrono::Timelike;
use sentinel_common::column_text_values;
use sentinel_model::{CrossFilter, FieldRole, HeatmapCell};
use tracing::debug;

use crate::dataset::Dataset;
use crate::datetime::date_values;
use crate::error::Result;

/// Narrow a dataset by the selections made on the charts.
///
/// The category selection matches exactly and the state selection matches as
/// a case-sensitive substring. Date and heatmap selections read the sheet's
/// date column; rows whose date cannot be read fail them. An empty selection
/// returns the dataset unchanged.
pub fn apply_cross_filter(dataset: &Dataset, selection: &CrossFilter) -> Result<Dataset> {
    if selection.is_empty() {
        return Ok(dataset.clone());
    }
    let mut keep = vec![true; dataset.height()];

    if let Some(category) = &selection.category {
        retain_text(dataset, FieldRole::Category, &mut keep, |value| {
            value == category.as_str()
        });
    }
    if let Some(needle) = &selection.state_contains {
        retain_text(dataset, FieldRole::State, &mut keep, |value| {
            value.contains(needle.as_str())
        });
    }

    if selection.date.is_some() || !selection.weekday_hours.is_empty() {
        match dataset.date_column().and_then(|field| date_values(dataset.data(), field)) {
            Some(dates) => {
                for (kept, value) in keep.iter_mut().zip(dates) {
                    let Some(dt) = value else {
                        *kept = false;
                        continue;
                    };
                    if let Some(day) = selection.date {
                        *kept &= dt.date() == day;
                    }
                    if !selection.weekday_hours.is_empty() {
                        let cell = HeatmapCell::of(dt.date(), dt.hour());
                        *kept &= selection.weekday_hours.contains(&cell);
                    }
                }
            }
            None => debug!(
                sheet = dataset.name(),
                "date column absent, date selections skipped"
            ),
        }
    }

    dataset.retain(&keep)
}

fn retain_text(
    dataset: &Dataset,
    role: FieldRole,
    keep: &mut [bool],
    matches: impl Fn(&str) -> bool,
) {
    let Some(values) = dataset
        .column(role)
        .and_then(|field| column_text_values(dataset.data(), field))
    else {
        debug!(sheet = dataset.name(), role = %role, "column absent, selection skipped");
        return;
    };
    for (kept, value) in keep.iter_mut().zip(values) {
        *kept &= value.as_deref().is_some_and(&matches);
    }
}
