//! Date column normalization.

use polars::prelude::{DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use tracing::debug;

use crate::dataset::Dataset;
use crate::datetime::date_values;
use crate::error::Result;

/// Parse `date_field` into a datetime column and drop rows that do not parse.
///
/// Missing and unreadable values are excluded silently. Surviving rows keep
/// their order, and the column is rewritten in place as microsecond
/// `Datetime`. A dataset without the column is returned unchanged.
pub fn normalize(dataset: &Dataset, date_field: &str) -> Result<Dataset> {
    let Some(values) = date_values(dataset.data(), date_field) else {
        debug!(
            sheet = dataset.name(),
            field = date_field,
            "date column absent, skipping normalization"
        );
        return Ok(dataset.clone());
    };

    let keep: Vec<bool> = values.iter().map(Option::is_some).collect();
    let dropped = keep.iter().filter(|kept| !**kept).count();
    let micros: Vec<Option<i64>> = values
        .into_iter()
        .flatten()
        .map(|dt| Some(dt.and_utc().timestamp_micros()))
        .collect();

    let mut data = dataset.retain(&keep)?.into_data();
    let column = Series::new(date_field.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        .into_column();
    data.with_column(column)?;

    if dropped > 0 {
        debug!(
            sheet = dataset.name(),
            field = date_field,
            dropped,
            kept = data.height(),
            "dropped rows with unreadable dates"
        );
    }
    Ok(dataset.with_data(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{AnyValue, Column, DataFrame};
    use sentinel_model::SheetSchema;

    fn dataset(dates: &[Option<&str>]) -> Dataset {
        let ids: Vec<i32> = (0..dates.len() as i32).collect();
        let data = DataFrame::new(vec![
            Column::new("id".into(), ids),
            Column::new("Data de cadastro".into(), dates.to_vec()),
        ])
        .unwrap();
        Dataset::new("ATIVOS PF E PJ", data, SheetSchema::default())
    }

    #[test]
    fn drops_unreadable_and_keeps_order() {
        let ds = dataset(&[
            Some("2024-01-03"),
            Some("garbage"),
            None,
            Some("2024-01-01"),
            Some(""),
            Some("2024-01-02 09:00"),
        ]);
        let out = normalize(&ds, "Data de cadastro").unwrap();

        assert_eq!(out.height(), 3);
        let ids: Vec<i32> = out
            .data()
            .column("id")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![0, 3, 5]);
        assert_eq!(
            out.data().column("Data de cadastro").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
        assert!(matches!(
            out.data().column("Data de cadastro").unwrap().get(0).unwrap(),
            AnyValue::Datetime(_, TimeUnit::Microseconds, _)
        ));
    }

    #[test]
    fn missing_column_is_identity() {
        let ds = dataset(&[Some("2024-01-03"), Some("x")]);
        let out = normalize(&ds, "Data de saida").unwrap();
        assert!(out.data().equals_missing(ds.data()));
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let ds = dataset(&[Some("2024-01-03"), Some("x"), Some("2024-02-01")]);
        let once = normalize(&ds, "Data de cadastro").unwrap();
        let twice = normalize(&once, "Data de cadastro").unwrap();
        assert!(once.data().equals_missing(twice.data()));
    }

    #[test]
    fn two_digit_years_read_as_this_century() {
        let ds = dataset(&[Some("2024-03-01"), Some("03/04/24"), Some("24-03-04")]);
        let out = normalize(&ds, "Data de cadastro").unwrap();

        assert_eq!(out.height(), 2);
        let dates: Vec<_> = date_values(out.data(), "Data de cadastro")
            .unwrap()
            .into_iter()
            .map(|dt| dt.unwrap().date().to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-04"]);
    }
}
