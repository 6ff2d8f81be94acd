//! Property tests for filtering and the KPI bounds.

use chrono::{Days, NaiveDate};
use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;
use sentinel_engine::{Dataset, filter, growth_rate_pct, incompleteness_pct, normalize};
use sentinel_model::{FilterCriteria, Period, SheetSchema};

const CATEGORIES: [&str; 4] = ["PF", "PJ", "MEI", ""];
const STATES: [&str; 4] = ["SP", "RJ", "MG", ""];
const DATE: &str = "Data de cadastro";

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// (category index, state index, day offset or unreadable)
type Row = (usize, usize, Option<u64>);

fn build(rows: &[Row]) -> Dataset {
    let ids: Vec<i32> = (0..rows.len() as i32).collect();
    let categories: Vec<&str> = rows.iter().map(|r| CATEGORIES[r.0]).collect();
    let states: Vec<&str> = rows.iter().map(|r| STATES[r.1]).collect();
    let dates: Vec<String> = rows
        .iter()
        .map(|r| match r.2 {
            Some(offset) => (base_day() + Days::new(offset)).to_string(),
            None => "n/d".to_string(),
        })
        .collect();
    let data = DataFrame::new(vec![
        Column::new("id".into(), ids),
        Column::new("Categoria".into(), categories),
        Column::new("Estado".into(), states),
        Column::new(DATE.into(), dates),
    ])
    .unwrap();
    Dataset::new("ATIVOS PF E PJ", data, SheetSchema::default())
}

fn ids(dataset: &Dataset) -> Vec<i32> {
    dataset
        .data()
        .column("id")
        .unwrap()
        .i32()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((0usize..4, 0usize..4, prop::option::of(0u64..200)), 0..40)
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::collection::btree_set(0usize..3, 0..3),
        prop::collection::btree_set(0usize..3, 0..3),
        prop::option::of((0u64..200, 0u64..60)),
    )
        .prop_map(|(categories, states, range)| {
            let mut criteria = FilterCriteria::new()
                .with_categories(categories.into_iter().map(|i| CATEGORIES[i]))
                .with_states(states.into_iter().map(|i| STATES[i]));
            if let Some((start, len)) = range {
                let start = base_day() + Days::new(start);
                criteria = criteria.with_date_range(Some(start), Some(start + Days::new(len)));
            }
            criteria
        })
}

proptest! {
    #[test]
    fn empty_criteria_is_identity(rows in rows()) {
        let ds = build(&rows);
        let out = filter(&ds, &FilterCriteria::new()).unwrap();
        prop_assert!(out.data().equals_missing(ds.data()));
    }

    #[test]
    fn filter_is_idempotent(rows in rows(), criteria in criteria()) {
        let ds = build(&rows);
        let once = filter(&ds, &criteria).unwrap();
        let twice = filter(&once, &criteria).unwrap();
        prop_assert!(once.data().equals_missing(twice.data()));
    }

    #[test]
    fn filter_preserves_order(rows in rows(), criteria in criteria()) {
        let out = ids(&filter(&build(&rows), &criteria).unwrap());
        prop_assert!(out.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn normalize_keeps_readable_rows_in_order(rows in rows()) {
        let out = normalize(&build(&rows), DATE).unwrap();
        let expected: Vec<i32> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.2.is_some())
            .map(|(idx, _)| idx as i32)
            .collect();
        prop_assert_eq!(ids(&out), expected);
    }

    #[test]
    fn incompleteness_is_a_percentage(rows in rows()) {
        let pct = incompleteness_pct(&build(&rows), &["Categoria", "Estado"]);
        prop_assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn growth_is_finite(rows in rows()) {
        let ds = build(&rows);
        for period in [Period::Daily, Period::Weekly, Period::Monthly, Period::Quarterly] {
            prop_assert!(growth_rate_pct(&ds, DATE, period).is_finite());
        }
    }
}
