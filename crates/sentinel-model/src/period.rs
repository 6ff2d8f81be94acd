//! Calendar-aligned period buckets.
//!
//! Buckets are fixed calendar intervals, never rolling windows. Weeks run
//! Monday through Sunday.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Granularity used for time series and growth-rate buckets.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
        }
    }

    /// First day of the bucket containing `date`.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Daily => date,
            Period::Weekly => {
                date - Days::new(u64::from(date.weekday().num_days_from_monday()))
            }
            Period::Monthly => first_of_month(date),
            Period::Quarterly => first_of_month(date) - Months::new(date.month0() % 3),
        }
    }

    /// First day of the bucket following the one that starts at `start`.
    pub fn next_start(self, start: NaiveDate) -> NaiveDate {
        match self {
            Period::Daily => start + Days::new(1),
            Period::Weekly => start + Days::new(7),
            Period::Monthly => start + Months::new(1),
            Period::Quarterly => start + Months::new(3),
        }
    }

    /// Display label for the bucket that starts at `start`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use sentinel_model::Period;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    /// assert_eq!(Period::Monthly.label(start), "2024-04");
    /// assert_eq!(Period::Quarterly.label(start), "2024Q2");
    /// assert_eq!(Period::Weekly.label(start), "2024-04-01/2024-04-07");
    /// ```
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Period::Daily => start.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let end = start + Days::new(6);
                format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Period::Monthly => start.format("%Y-%m").to_string(),
            Period::Quarterly => format!("{}Q{}", start.year(), start.month0() / 3 + 1),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ModelError;

    /// Accepts English names, the dashboard's Portuguese labels and the
    /// single-letter frequency aliases (`D`, `W`, `M`, `Q`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" | "diária" | "diaria" => Ok(Period::Daily),
            "weekly" | "week" | "w" | "semanal" => Ok(Period::Weekly),
            "monthly" | "month" | "m" | "me" | "mensal" => Ok(Period::Monthly),
            "quarterly" | "quarter" | "q" | "trimestral" => Ok(Period::Quarterly),
            other => Err(ModelError::UnknownPeriod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_buckets_start_on_monday() {
        // 2024-03-10 is a Sunday.
        assert_eq!(Period::Weekly.bucket_start(date(2024, 3, 10)), date(2024, 3, 4));
        assert_eq!(Period::Weekly.bucket_start(date(2024, 3, 11)), date(2024, 3, 11));
        assert_eq!(Period::Weekly.next_start(date(2024, 3, 4)), date(2024, 3, 11));
    }

    #[test]
    fn monthly_and_quarterly_buckets() {
        assert_eq!(Period::Monthly.bucket_start(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(Period::Monthly.next_start(date(2024, 12, 1)), date(2025, 1, 1));
        assert_eq!(Period::Quarterly.bucket_start(date(2024, 6, 30)), date(2024, 4, 1));
        assert_eq!(Period::Quarterly.bucket_start(date(2024, 1, 1)), date(2024, 1, 1));
        assert_eq!(Period::Quarterly.next_start(date(2024, 10, 1)), date(2025, 1, 1));
    }

    #[test]
    fn labels() {
        assert_eq!(Period::Daily.label(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(Period::Monthly.label(date(2024, 1, 1)), "2024-01");
        assert_eq!(Period::Quarterly.label(date(2024, 10, 1)), "2024Q4");
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("Mensal".parse::<Period>(), Ok(Period::Monthly));
        assert_eq!("W".parse::<Period>(), Ok(Period::Weekly));
        assert_eq!("quarterly".parse::<Period>(), Ok(Period::Quarterly));
        assert!(matches!(
            "hourly".parse::<Period>(),
            Err(ModelError::UnknownPeriod(_))
        ));
    }
}
