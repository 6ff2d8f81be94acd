//! Data model for the Data Sentinel dashboard core.
//!
//! Plain value types shared by ingestion, the metrics engine and the CLI. Nothing
//! here touches a DataFrame.

pub mod config;
pub mod criteria;
pub mod error;
pub mod fields;
pub mod kpi;
pub mod period;

pub use config::DashboardConfig;
pub use criteria::{CrossFilter, FilterCriteria, HeatmapCell};
pub use error::{ModelError, Result};
pub use fields::{FieldMap, FieldRole, SheetProfile, SheetSchema};
pub use kpi::{KpiSettings, KpiSummary, WindowCount};
pub use period::Period;
