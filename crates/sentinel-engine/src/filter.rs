//! Sidebar filtering.

use std::collections::BTreeSet;

use sentinel_common::column_text_values;
use sentinel_model::{FieldRole, FilterCriteria};
use tracing::debug;

use crate::dataset::Dataset;
use crate::datetime::date_values;
use crate::error::Result;

/// Keep the rows that satisfy every active dimension of `criteria`.
///
/// Each set-valued dimension keeps rows whose value is one of the selected
/// values; an empty set keeps everything. The date range is inclusive on both
/// ends at day granularity and only applies when both ends are set. A dimension
/// whose column the sheet lacks is skipped. Row order is preserved.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Result<Dataset> {
    let mut keep = vec![true; dataset.height()];
    let mut active = false;

    let dimensions = [
        (FieldRole::Responsible, &criteria.responsibles),
        (FieldRole::Category, &criteria.categories),
        (FieldRole::State, &criteria.states),
    ];
    for (role, allowed) in dimensions {
        if allowed.is_empty() {
            continue;
        }
        let Some(field) = dataset.column(role) else {
            debug!(sheet = dataset.name(), role = %role, "column absent, filter skipped");
            continue;
        };
        active |= keep_members(dataset, field, allowed, &mut keep);
    }

    if let Some((start, end)) = criteria.date_range() {
        let field = criteria
            .date_field
            .as_deref()
            .unwrap_or(dataset.schema().date.as_str());
        match date_values(dataset.data(), field) {
            Some(dates) => {
                active = true;
                for (kept, value) in keep.iter_mut().zip(dates) {
                    let day = value.map(|dt| dt.date());
                    *kept &= day.is_some_and(|day| start <= day && day <= end);
                }
            }
            None => debug!(
                sheet = dataset.name(),
                field,
                "date column absent, period filter skipped"
            ),
        }
    }

    if !active {
        return Ok(dataset.clone());
    }
    let out = dataset.retain(&keep)?;
    debug!(
        sheet = dataset.name(),
        before = dataset.height(),
        after = out.height(),
        "filter applied"
    );
    Ok(out)
}

fn keep_members(
    dataset: &Dataset,
    field: &str,
    allowed: &BTreeSet<String>,
    keep: &mut [bool],
) -> bool {
    let Some(values) = column_text_values(dataset.data(), field) else {
        return false;
    };
    for (kept, value) in keep.iter_mut().zip(values) {
        *kept &= value.is_some_and(|v| allowed.contains(&v));
    }
    true
}
