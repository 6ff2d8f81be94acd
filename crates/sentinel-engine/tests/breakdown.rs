//! Chart breakdowns and cross-filter selections.

use chrono::{NaiveDate, Weekday};
use polars::prelude::{Column, DataFrame};
use sentinel_engine::{
    Dataset, PeriodCount, ValueCount, ValuePairCount, apply_cross_filter, count, date_bounds,
    filter_options, normalize, period_category_counts, period_counts, top_values, value_counts,
    value_pair_counts, weekday_hour_counts,
};
use sentinel_model::{CrossFilter, HeatmapCell, Period, SheetSchema};

const DATE: &str = "Data de cadastro";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Six rows spread over Jan and Mar 2024.
fn sample() -> Dataset {
    let data = DataFrame::new(vec![
        Column::new(
            "Usuário responsável".into(),
            [Some("bia"), Some("ana"), Some("bia"), None, Some("caio"), Some("ana")],
        ),
        Column::new(
            "Categoria".into(),
            [Some("PJ"), Some("PF"), Some("PJ"), Some("PJ"), Some(""), Some("PF")],
        ),
        Column::new(
            "Estado".into(),
            ["SP - São Paulo", "RJ - Rio", "SP - São Paulo", "MG", "SP", "RJ - Rio"],
        ),
        Column::new(
            DATE.into(),
            [
                "2024-01-01 09:15", // Monday
                "2024-01-01 18:00",
                "2024-01-08 09:40", // Monday
                "2024-03-05 10:00", // Tuesday
                "invalid",
                "2024-03-31 23:59", // Sunday
            ],
        ),
    ])
    .unwrap();
    Dataset::new("ATIVOS PF E PJ", data, SheetSchema::default())
}

fn vc(value: &str, count: usize) -> ValueCount {
    ValueCount {
        value: value.to_string(),
        count,
    }
}

#[test]
fn options_are_sorted_and_distinct() {
    let ds = sample();
    assert_eq!(filter_options(&ds, "Categoria"), vec!["PF", "PJ"]);
    assert_eq!(
        filter_options(&ds, "Usuário responsável"),
        vec!["ana", "bia", "caio"]
    );
    assert!(filter_options(&ds, "Canal").is_empty());
}

#[test]
fn bounds_ignore_unreadable_dates() {
    let ds = sample();
    assert_eq!(
        date_bounds(&ds, DATE),
        Some((day(2024, 1, 1), day(2024, 3, 31)))
    );
    assert_eq!(date_bounds(&ds, "Data de saida"), None);
}

#[test]
fn value_counts_order_by_count_then_value() {
    let ds = sample();
    assert_eq!(
        value_counts(&ds, "Usuário responsável"),
        vec![vc("ana", 2), vc("bia", 2), vc("caio", 1)]
    );
    assert_eq!(top_values(&ds, "Categoria", 1), vec![vc("PJ", 3)]);
    assert!(value_counts(&ds, "Canal").is_empty());
}

#[test]
fn period_counts_fill_empty_months() {
    let ds = sample();
    let counts = period_counts(&ds, DATE, Period::Monthly);
    let summary: Vec<(&str, usize)> = counts
        .iter()
        .map(|PeriodCount { label, count, .. }| (label.as_str(), *count))
        .collect();
    assert_eq!(summary, vec![("2024-01", 3), ("2024-02", 0), ("2024-03", 2)]);
    assert_eq!(counts[0].start, day(2024, 1, 1));

    let weekly = period_counts(&ds, DATE, Period::Weekly);
    assert_eq!(weekly[0].label, "2024-01-01/2024-01-07");
    assert_eq!(weekly.iter().map(|p| p.count).sum::<usize>(), 5);
}

#[test]
fn period_category_pairs() {
    let ds = sample();
    let pairs = period_category_counts(&ds, DATE, "Categoria", Period::Monthly);
    let summary: Vec<(&str, &str, usize)> = pairs
        .iter()
        .map(|p| (p.label.as_str(), p.category.as_str(), p.count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2024-01", "PF", 1),
            ("2024-01", "PJ", 2),
            ("2024-03", "PF", 1),
            ("2024-03", "PJ", 1),
        ]
    );
}

#[test]
fn state_category_pairs() {
    let ds = sample();
    let pair = |first: &str, second: &str, count| ValuePairCount {
        first: first.to_string(),
        second: second.to_string(),
        count,
    };
    assert_eq!(
        value_pair_counts(&ds, "Estado", "Categoria"),
        vec![
            pair("RJ - Rio", "PF", 2),
            pair("SP - São Paulo", "PJ", 2),
            pair("MG", "PJ", 1),
        ]
    );
    assert!(value_pair_counts(&ds, "Estado", "Canal").is_empty());
}

#[test]
fn monthly_state_series() {
    let ds = sample();
    let pairs = period_category_counts(&ds, DATE, "Estado", Period::Monthly);
    let summary: Vec<(&str, &str, usize)> = pairs
        .iter()
        .map(|p| (p.label.as_str(), p.category.as_str(), p.count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2024-01", "RJ - Rio", 1),
            ("2024-01", "SP - São Paulo", 2),
            ("2024-03", "MG", 1),
            ("2024-03", "RJ - Rio", 1),
        ]
    );
}

#[test]
fn short_year_dates_stay_in_range() {
    let data = DataFrame::new(vec![Column::new(
        DATE.into(),
        ["2024-03-01", "03/04/24", "2024-03-05"],
    )])
    .unwrap();
    let ds = normalize(
        &Dataset::new("ATIVOS PF E PJ", data, SheetSchema::default()),
        DATE,
    )
    .unwrap();

    assert_eq!(count(&ds), 3);
    assert_eq!(
        date_bounds(&ds, DATE),
        Some((day(2024, 3, 1), day(2024, 3, 5)))
    );
    let daily = period_counts(&ds, DATE, Period::Daily);
    assert_eq!(daily.len(), 5);
    assert_eq!(daily.iter().map(|p| p.count).sum::<usize>(), 3);
}

#[test]
fn heatmap_grid_is_monday_first() {
    let grid = weekday_hour_counts(&sample(), DATE);
    assert_eq!(grid.get(HeatmapCell::new(Weekday::Mon, 9)), 2);
    assert_eq!(grid.get(HeatmapCell::new(Weekday::Mon, 18)), 1);
    assert_eq!(grid.get(HeatmapCell::new(Weekday::Tue, 10)), 1);
    assert_eq!(grid.get(HeatmapCell::new(Weekday::Sun, 23)), 1);
    assert_eq!(grid.total(), 5);
}

#[test]
fn cross_filter_selections() {
    let ds = sample();
    assert_eq!(count(&apply_cross_filter(&ds, &CrossFilter::new()).unwrap()), 6);

    let pj = apply_cross_filter(&ds, &CrossFilter::new().with_category("PJ")).unwrap();
    assert_eq!(count(&pj), 3);

    let on_day = CrossFilter::new().with_date(day(2024, 1, 1));
    assert_eq!(count(&apply_cross_filter(&ds, &on_day).unwrap()), 2);

    let cells = CrossFilter::new()
        .with_cell(HeatmapCell::new(Weekday::Mon, 9))
        .with_cell(HeatmapCell::new(Weekday::Sun, 23));
    assert_eq!(count(&apply_cross_filter(&ds, &cells).unwrap()), 3);

    let state = CrossFilter::new().with_state_contains("SP");
    assert_eq!(count(&apply_cross_filter(&ds, &state).unwrap()), 3);

    let combined = CrossFilter::new()
        .with_category("PJ")
        .with_state_contains("SP")
        .with_date(day(2024, 1, 8));
    assert_eq!(count(&apply_cross_filter(&ds, &combined).unwrap()), 1);
}

#[test]
fn breakdowns_read_normalized_columns() {
    let normalized = normalize(&sample(), DATE).unwrap();
    assert_eq!(count(&normalized), 5);
    assert_eq!(
        period_counts(&normalized, DATE, Period::Quarterly),
        vec![PeriodCount {
            start: day(2024, 1, 1),
            label: "2024Q1".to_string(),
            count: 5,
        }]
    );
    assert_eq!(weekday_hour_counts(&normalized, DATE).total(), 5);
}
