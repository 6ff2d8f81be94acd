//! Reading sheet cells through Polars `AnyValue`.
//!
//! Sheets arrive with whatever dtype the loader produced. Categorical values
//! are compared by their text form, so every cell goes through [`cell_text`].

use polars::prelude::{AnyValue, DataFrame};

/// Text form of a cell.
///
/// Null reads as the empty string. Floats lose trailing zeros, so a category
/// code stored as `3.0` in a workbook matches the text `"3"`.
///
/// ```
/// use polars::prelude::AnyValue;
/// use sentinel_common::cell_text;
///
/// assert_eq!(cell_text(AnyValue::Null), "");
/// assert_eq!(cell_text(AnyValue::Float64(3.0)), "3");
/// assert_eq!(cell_text(AnyValue::String("PJ")), "PJ");
/// ```
pub fn cell_text(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(text) => text.to_owned(),
        AnyValue::StringOwned(text) => text.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => other.to_string(),
    }
}

/// True for null, NaN and whitespace-only cells.
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(text) => text.trim().is_empty(),
        AnyValue::StringOwned(text) => text.trim().is_empty(),
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Shortest decimal text for a float: `1.0` prints as `1`, `2.50` as `2.5`.
///
/// ```
/// use sentinel_common::format_numeric;
///
/// assert_eq!(format_numeric(12.0), "12");
/// assert_eq!(format_numeric(-0.25), "-0.25");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        // Also folds -0.0.
        return "0".to_string();
    }
    let text = v.to_string();
    match text.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => text,
    }
}

/// Every cell of a column as text, `None` where the cell is missing.
///
/// Returns `None` when the frame has no such column.
pub fn column_text_values(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    let values = (0..df.height())
        .map(|idx| {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            (!is_missing(&value)).then(|| cell_text(value))
        })
        .collect();
    Some(values)
}
