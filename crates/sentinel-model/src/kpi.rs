//! KPI settings and the bundled KPI summary.

use serde::{Deserialize, Serialize};

use crate::period::Period;

/// How the KPI cards are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSettings {
    /// Trailing window for the "last days" card.
    pub short_window_days: u32,
    /// Trailing window for the "new records" card.
    pub long_window_days: u32,
    /// Bucket size for the growth-rate card.
    pub growth_period: Period,
    /// Columns checked by the incompleteness card, by column name or role name.
    /// Empty means the responsible, category and state columns of the sheet.
    pub relevant_fields: Vec<String>,
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            short_window_days: 7,
            long_window_days: 30,
            growth_period: Period::Monthly,
            relevant_fields: Vec::new(),
        }
    }
}

/// Row count inside a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowCount {
    pub days: u32,
    pub count: usize,
}

/// Every KPI card for one (possibly filtered) dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total: usize,
    pub categories: usize,
    pub states: usize,
    pub recent_short: WindowCount,
    pub recent_long: WindowCount,
    /// Percentage of rows missing a relevant field, 0..=100.
    pub incomplete_pct: f64,
    /// Change between the last two buckets, in percent.
    pub growth_pct: f64,
    pub growth_period: Period,
}
