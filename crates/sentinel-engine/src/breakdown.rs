//! Chart data: option lists, value counts, time series and the weekday heatmap.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use sentinel_common::column_text_values;
use sentinel_model::{HeatmapCell, Period};
use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::datetime::date_values;

/// Occurrences of one value in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Most buckets a contiguous series holds; older buckets are dropped first.
pub const MAX_SERIES_BUCKETS: usize = 10_000;

/// Occurrences of one pair of values from two columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuePairCount {
    pub first: String,
    pub second: String,
    pub count: usize,
}

/// Row count of one calendar bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodCount {
    pub start: NaiveDate,
    pub label: String,
    pub count: usize,
}

/// Row count of one (bucket, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodCategoryCount {
    pub start: NaiveDate,
    pub label: String,
    pub category: String,
    pub count: usize,
}

/// Row counts by weekday (Monday first) and hour of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayHourGrid {
    pub counts: [[usize; 24]; 7],
}

impl WeekdayHourGrid {
    pub fn get(&self, cell: HeatmapCell) -> usize {
        self.counts
            .get(usize::from(cell.weekday))
            .and_then(|row| row.get(usize::from(cell.hour)))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Sorted distinct values offered by a multi-select.
pub fn filter_options(dataset: &Dataset, field: &str) -> Vec<String> {
    column_text_values(dataset.data(), field)
        .map(|values| {
            values
                .into_iter()
                .flatten()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
        .unwrap_or_default()
}

/// Earliest and latest readable day of a date column.
pub fn date_bounds(dataset: &Dataset, field: &str) -> Option<(NaiveDate, NaiveDate)> {
    let days = readable_dates(dataset, field).map(|dt| dt.date());
    days.fold(None, |bounds, day| match bounds {
        None => Some((day, day)),
        Some((min, max)) => Some((min.min(day), max.max(day))),
    })
}

/// Non-missing values of a column with their counts, most frequent first.
///
/// Ties are ordered by value.
pub fn value_counts(dataset: &Dataset, field: &str) -> Vec<ValueCount> {
    let Some(values) = column_text_values(dataset.data(), field) else {
        return Vec::new();
    };
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }
    let mut out: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

/// The `n` most frequent values of a column.
pub fn top_values(dataset: &Dataset, field: &str, n: usize) -> Vec<ValueCount> {
    let mut counts = value_counts(dataset, field);
    counts.truncate(n);
    counts
}

/// Row counts of each pair of values across two columns, most frequent first.
///
/// Rows missing either value are left out. Ties are ordered by the first
/// value, then the second.
pub fn value_pair_counts(
    dataset: &Dataset,
    first_field: &str,
    second_field: &str,
) -> Vec<ValuePairCount> {
    let (Some(firsts), Some(seconds)) = (
        column_text_values(dataset.data(), first_field),
        column_text_values(dataset.data(), second_field),
    ) else {
        return Vec::new();
    };

    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for pair in firsts.into_iter().zip(seconds) {
        if let (Some(first), Some(second)) = pair {
            *counts.entry((first, second)).or_default() += 1;
        }
    }
    let mut out: Vec<ValuePairCount> = counts
        .into_iter()
        .map(|((first, second), count)| ValuePairCount {
            first,
            second,
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first.cmp(&b.first))
            .then_with(|| a.second.cmp(&b.second))
    });
    out
}

/// Row counts per calendar bucket, from the first populated bucket to the last.
///
/// Buckets between populated ones are present with a zero count. At most
/// [`MAX_SERIES_BUCKETS`] of the latest buckets are returned.
pub fn period_counts(dataset: &Dataset, date_field: &str, period: Period) -> Vec<PeriodCount> {
    calendar_buckets(readable_dates(dataset, date_field), period)
        .into_iter()
        .map(|(start, count)| PeriodCount {
            start,
            label: period.label(start),
            count,
        })
        .collect()
}

/// Row counts per (bucket, category) pair, for pairs that occur.
///
/// Rows with a missing category or an unreadable date are left out.
pub fn period_category_counts(
    dataset: &Dataset,
    date_field: &str,
    category_field: &str,
    period: Period,
) -> Vec<PeriodCategoryCount> {
    let (Some(dates), Some(categories)) = (
        date_values(dataset.data(), date_field),
        column_text_values(dataset.data(), category_field),
    ) else {
        return Vec::new();
    };

    let mut counts: BTreeMap<(NaiveDate, String), usize> = BTreeMap::new();
    for (date, category) in dates.into_iter().zip(categories) {
        if let (Some(date), Some(category)) = (date, category) {
            let start = period.bucket_start(date.date());
            *counts.entry((start, category)).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|((start, category), count)| PeriodCategoryCount {
            start,
            label: period.label(start),
            category,
            count,
        })
        .collect()
}

/// Row counts by weekday and hour of the date column.
pub fn weekday_hour_counts(dataset: &Dataset, date_field: &str) -> WeekdayHourGrid {
    let mut counts = [[0usize; 24]; 7];
    for dt in readable_dates(dataset, date_field) {
        let cell = HeatmapCell::of(dt.date(), dt.hour());
        counts[usize::from(cell.weekday)][usize::from(cell.hour)] += 1;
    }
    WeekdayHourGrid { counts }
}

fn readable_dates(dataset: &Dataset, field: &str) -> impl Iterator<Item = NaiveDateTime> {
    date_values(dataset.data(), field)
        .unwrap_or_default()
        .into_iter()
        .flatten()
}

/// Count dates per contiguous calendar bucket.
///
/// The series spans every bucket between the earliest and latest date, so a
/// single outlying date can stretch it; only the latest
/// [`MAX_SERIES_BUCKETS`] are kept.
pub(crate) fn calendar_buckets(
    dates: impl Iterator<Item = NaiveDateTime>,
    period: Period,
) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for dt in dates {
        *counts.entry(period.bucket_start(dt.date())).or_default() += 1;
    }
    let (Some(first), Some(last)) = (
        counts.keys().next().copied(),
        counts.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut buckets = VecDeque::new();
    let mut skipped = 0usize;
    let mut start = first;
    while start <= last {
        if buckets.len() == MAX_SERIES_BUCKETS {
            buckets.pop_front();
            skipped += 1;
        }
        buckets.push_back((start, counts.get(&start).copied().unwrap_or(0)));
        start = period.next_start(start);
    }
    if skipped > 0 {
        debug!(
            period = %period,
            skipped,
            kept = buckets.len(),
            "series truncated to the latest buckets"
        );
    }
    buckets.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn buckets_fill_gaps() {
        let dates = vec![at(2024, 1, 5), at(2024, 1, 20), at(2024, 3, 2)];
        let buckets = calendar_buckets(dates.into_iter(), Period::Monthly);
        assert_eq!(
            buckets,
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2),
                (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 0),
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 1),
            ]
        );
    }

    #[test]
    fn buckets_empty_input() {
        assert!(calendar_buckets(std::iter::empty(), Period::Weekly).is_empty());
    }

    #[test]
    fn outlying_date_keeps_latest_buckets() {
        let dates = vec![at(1990, 1, 1), at(2024, 3, 9), at(2024, 3, 10)];
        let buckets = calendar_buckets(dates.into_iter(), Period::Daily);

        assert_eq!(buckets.len(), MAX_SERIES_BUCKETS);
        assert_eq!(
            buckets.last(),
            Some(&(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 1))
        );
        assert_eq!(
            buckets[MAX_SERIES_BUCKETS - 2],
            (NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), 1)
        );
        assert_eq!(buckets.iter().map(|(_, n)| n).sum::<usize>(), 2);
    }

    #[test]
    fn grid_lookup() {
        let mut grid = WeekdayHourGrid {
            counts: [[0; 24]; 7],
        };
        grid.counts[6][23] = 4;
        assert_eq!(
            grid.get(HeatmapCell::new(chrono::Weekday::Sun, 23)),
            4
        );
        assert_eq!(grid.total(), 4);
    }
}
