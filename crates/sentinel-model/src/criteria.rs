//! Filter selections passed into the engine on every call.
//!
//! [`FilterCriteria`] mirrors the sidebar (multi-selects plus a period), and
//! [`CrossFilter`] carries the chart selections that narrow the sidebar result
//! further. Both are plain values; the engine never keeps selections between
//! calls.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

/// Sidebar selections.
///
/// Set-valued dimensions are OR within the set and AND across dimensions. An
/// empty set does not restrict anything. The date range applies only when both
/// ends are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub responsibles: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub states: BTreeSet<String>,
    /// Inclusive first day of the period.
    pub start_date: Option<NaiveDate>,
    /// Inclusive last day of the period.
    pub end_date: Option<NaiveDate>,
    /// Column the period applies to; `None` uses the dataset's date column.
    pub date_field: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_responsibles<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responsibles = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_states<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    #[must_use]
    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }

    /// Both ends of the period, when the range is active.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// True when no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.responsibles.is_empty()
            && self.categories.is_empty()
            && self.states.is_empty()
            && self.date_range().is_none()
    }
}

/// One cell of the weekday × hour heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeatmapCell {
    /// Days from Monday (0 = Monday, 6 = Sunday).
    pub weekday: u8,
    /// Hour of day, 0..=23.
    pub hour: u8,
}

impl HeatmapCell {
    pub fn new(weekday: Weekday, hour: u8) -> Self {
        Self {
            weekday: weekday.num_days_from_monday() as u8,
            hour,
        }
    }

    /// Cell for a calendar day and hour of day.
    pub fn of(date: NaiveDate, hour: u32) -> Self {
        Self::new(date.weekday(), hour.min(23) as u8)
    }
}

/// Selections made by clicking on charts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossFilter {
    /// Donut slice: keep rows with exactly this category.
    pub category: Option<String>,
    /// Time bar: keep rows recorded on this calendar day.
    pub date: Option<NaiveDate>,
    /// Heatmap lasso: keep rows whose (weekday, hour) is selected.
    pub weekday_hours: BTreeSet<HeatmapCell>,
    /// Map point: keep rows whose state contains this text.
    pub state_contains: Option<String>,
}

impl CrossFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_cell(mut self, cell: HeatmapCell) -> Self {
        self.weekday_hours.insert(cell);
        self
    }

    #[must_use]
    pub fn with_state_contains(mut self, text: impl Into<String>) -> Self {
        self.state_contains = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.date.is_none()
            && self.weekday_hours.is_empty()
            && self.state_contains.is_none()
    }

    /// Drop every selection ("reset filters").
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
