//! Reading cell values as calendar date-times.
//!
//! Cells may hold native Polars temporal values (already normalized frames,
//! typed CSV columns) or free text from a spreadsheet. Text is tried against a
//! fixed list of layouts; the first layout that parses wins.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use polars::prelude::{AnyValue, DataFrame, TimeUnit};
use sentinel_common::cell_text;

/// Days between 0001-01-01 (CE) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// `%Y` accepts one to four digits, so a `%Y` layout only counts when the
/// year it read has four.
const MIN_FOUR_DIGIT_YEAR: i32 = 1000;

/// Parse a text cell into a date-time.
///
/// Date-only values land at midnight. Offsets are dropped after reading the
/// local wall-clock time. Slash dates are read month-first, falling back to
/// day-first when the month-first reading is impossible. Two-digit years
/// are only read in slash dates, as 2000-2068 or 1969-1999.
///
/// ```
/// use sentinel_engine::parse_datetime;
///
/// let dt = parse_datetime("2024-03-10 14:30:00").unwrap();
/// assert_eq!(dt.to_string(), "2024-03-10 14:30:00");
/// assert_eq!(parse_datetime("25/12/2024").unwrap().to_string(), "2024-12-25 00:00:00");
/// assert!(parse_datetime("not a date").is_none());
/// ```
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    try_parse_with_offset(value)
        .or_else(|| try_parse_naive(value))
        .or_else(|| try_parse_date(value).map(|date| date.and_time(NaiveTime::MIN)))
}

fn try_parse_with_offset(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    let formats = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
    formats
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.naive_local())
}

fn try_parse_naive(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%d-%b-%Y %H:%M",
    ];
    let short_year = [
        "%m/%d/%y %H:%M:%S",
        "%m/%d/%y %H:%M",
        "%d/%m/%y %H:%M:%S",
        "%d/%m/%y %H:%M",
    ];
    formats
        .iter()
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .filter(|dt| dt.year() >= MIN_FOUR_DIGIT_YEAR)
        })
        .or_else(|| {
            short_year
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        })
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
        "%d-%b-%Y", // 15-Jan-2024
        "%Y%m%d",
    ];
    formats
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .filter(|date| date.year() >= MIN_FOUR_DIGIT_YEAR)
        })
        .or_else(|| {
            ["%m/%d/%y", "%d/%m/%y"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

/// Read any cell value as a date-time.
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Date(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(|date| date.and_time(NaiveTime::MIN)),
        AnyValue::Datetime(v, unit, _) => from_timestamp(v, unit),
        AnyValue::DatetimeOwned(v, unit, _) => from_timestamp(v, unit),
        AnyValue::String(s) => parse_datetime(s),
        AnyValue::StringOwned(s) => parse_datetime(s.as_str()),
        other => parse_datetime(&cell_text(other)),
    }
}

fn from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let delta = match unit {
        TimeUnit::Nanoseconds => TimeDelta::nanoseconds(value),
        TimeUnit::Microseconds => TimeDelta::microseconds(value),
        TimeUnit::Milliseconds => TimeDelta::try_milliseconds(value)?,
    };
    DateTime::<Utc>::UNIX_EPOCH.naive_utc().checked_add_signed(delta)
}

/// Every cell of a column read as a date-time, `None` where unreadable.
///
/// Returns `None` when the column does not exist.
pub fn date_values(df: &DataFrame, field: &str) -> Option<Vec<Option<NaiveDateTime>>> {
    let column = df.column(field).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_datetime(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Some(values)
}
