//! KPI cards.
//!
//! Every function here is total: absent columns, empty datasets and zero
//! baselines yield neutral values instead of errors.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use sentinel_common::{column_text_values, is_missing};
use sentinel_model::{FieldRole, KpiSettings, KpiSummary, Period, WindowCount};
use tracing::debug;

use crate::breakdown::calendar_buckets;
use crate::dataset::Dataset;
use crate::datetime::date_values;

/// Total number of rows.
pub fn count(dataset: &Dataset) -> usize {
    dataset.height()
}

/// Number of distinct non-missing values in `field`, 0 when the column is absent.
pub fn distinct_count(dataset: &Dataset, field: &str) -> usize {
    column_text_values(dataset.data(), field)
        .map(|values| values.into_iter().flatten().collect::<HashSet<_>>().len())
        .unwrap_or(0)
}

/// Rows dated within the `days` calendar days up to and including `today`.
///
/// The window is `[today - days, today]`; rows dated after `today` are not
/// counted.
pub fn recent_count(dataset: &Dataset, date_field: &str, days: u32, today: NaiveDate) -> usize {
    let Some(dates) = date_values(dataset.data(), date_field) else {
        return 0;
    };
    let threshold = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    dates
        .into_iter()
        .flatten()
        .map(|dt| dt.date())
        .filter(|day| threshold <= *day && *day <= today)
        .count()
}

/// Percentage of rows missing a value in any of `fields`, rounded to 2 decimals.
///
/// A value is missing when it is null or blank. Returns 0.0 for an empty
/// dataset, an empty field list, or when any of the fields is absent.
pub fn incompleteness_pct<S: AsRef<str>>(dataset: &Dataset, fields: &[S]) -> f64 {
    if dataset.is_empty() || fields.is_empty() {
        return 0.0;
    }
    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        match dataset.data().column(field.as_ref()) {
            Ok(column) => columns.push(column),
            Err(_) => {
                debug!(
                    sheet = dataset.name(),
                    field = field.as_ref(),
                    "relevant column absent, incompleteness reported as 0"
                );
                return 0.0;
            }
        }
    }

    let incomplete = (0..dataset.height())
        .filter(|&idx| {
            columns
                .iter()
                .any(|column| column.get(idx).map_or(true, |value| is_missing(&value)))
        })
        .count();
    round2(incomplete as f64 * 100.0 / dataset.height() as f64)
}

/// Change between the last two calendar buckets, in percent.
///
/// Buckets run contiguously from the first populated bucket to the last, so the
/// previous bucket may be empty. Returns 0.0 with fewer than two buckets or a
/// zero previous count.
pub fn growth_rate_pct(dataset: &Dataset, date_field: &str, period: Period) -> f64 {
    let Some(dates) = date_values(dataset.data(), date_field) else {
        return 0.0;
    };
    let buckets = calendar_buckets(dates.into_iter().flatten(), period);
    let [.., (_, previous), (_, latest)] = buckets.as_slice() else {
        return 0.0;
    };
    if *previous == 0 {
        return 0.0;
    }
    let previous = *previous as f64;
    round2((*latest as f64 - previous) / previous * 100.0)
}

/// Every KPI card for a dataset.
///
/// Relevant fields default to the sheet's responsible, category and state
/// columns when the settings list none. Configured entries that name a role
/// (`"state"`, `"categoria"`) resolve through the sheet schema; anything else is
/// taken as a column name.
pub fn kpi_summary(dataset: &Dataset, settings: &KpiSettings, today: NaiveDate) -> KpiSummary {
    let schema = dataset.schema();
    let date_field = schema.date.as_str();
    let relevant: Vec<&str> = if settings.relevant_fields.is_empty() {
        FieldRole::RELEVANT
            .iter()
            .map(|role| schema.column(*role))
            .collect()
    } else {
        settings
            .relevant_fields
            .iter()
            .map(|field| match field.parse::<FieldRole>() {
                Ok(role) => schema.column(role),
                Err(_) => field.as_str(),
            })
            .collect()
    };

    KpiSummary {
        total: count(dataset),
        categories: distinct_count(dataset, &schema.category),
        states: distinct_count(dataset, &schema.state),
        recent_short: WindowCount {
            days: settings.short_window_days,
            count: recent_count(dataset, date_field, settings.short_window_days, today),
        },
        recent_long: WindowCount {
            days: settings.long_window_days,
            count: recent_count(dataset, date_field, settings.long_window_days, today),
        },
        incomplete_pct: incompleteness_pct(dataset, &relevant),
        growth_pct: growth_rate_pct(dataset, date_field, settings.growth_period),
        growth_period: settings.growth_period,
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
