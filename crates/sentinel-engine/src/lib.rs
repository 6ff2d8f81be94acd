//! Filter and KPI engine for the Data Sentinel dashboard.
//!
//! Pure functions over a [`Dataset`]: date normalization, sidebar filtering,
//! chart cross-filtering, KPI cards and chart breakdowns. Nothing here keeps
//! state between calls; every operation returns a new value.
//!
//! # Example
//!
//! ```
//! use polars::prelude::{Column, DataFrame};
//! use sentinel_engine::{Dataset, count, distinct_count, filter};
//! use sentinel_model::{FilterCriteria, SheetSchema};
//!
//! let data = DataFrame::new(vec![Column::new(
//!     "Categoria".into(),
//!     ["PF", "PJ", "PF"],
//! )])
//! .unwrap();
//! let dataset = Dataset::new("ATIVOS PF E PJ", data, SheetSchema::default());
//!
//! let pf = filter(&dataset, &FilterCriteria::new().with_categories(["PF"])).unwrap();
//! assert_eq!(count(&pf), 2);
//! assert_eq!(distinct_count(&dataset, "Categoria"), 2);
//! ```

pub mod breakdown;
pub mod crossfilter;
pub mod dataset;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod normalize;

pub use breakdown::{
    MAX_SERIES_BUCKETS, PeriodCategoryCount, PeriodCount, ValueCount, ValuePairCount,
    WeekdayHourGrid, date_bounds, filter_options, period_category_counts, period_counts,
    top_values, value_counts, value_pair_counts, weekday_hour_counts,
};
pub use crossfilter::apply_cross_filter;
pub use dataset::Dataset;
pub use datetime::{any_to_datetime, date_values, parse_datetime};
pub use error::{EngineError, Result};
pub use filter::filter;
pub use kpi::{
    count, distinct_count, growth_rate_pct, incompleteness_pct, kpi_summary, recent_count, round2,
};
pub use normalize::normalize;
