//! Shared utilities for the cleaning pipeline.
//!
//! Helpers for column lookup, text/number extraction and tolerant numeric
//! parsing, shared by the normalizer, the cleaners and the forecast crate.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

// =============================================================================
// Column Access Utilities
// =============================================================================

/// Owned list of the column names of a DataFrame, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Whether a DataFrame has a column with the given name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Look up a column as a Series, failing with `ColumnNotFound`.
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| ProcessingError::ColumnNotFound(name.to_string()))
}

/// Text form of every value in a Series. Nulls stay null.
pub fn text_values(series: &Series) -> Result<Vec<Option<String>>> {
    let as_text = series.cast(&DataType::String)?;
    let chunked = as_text.str()?;
    Ok(chunked
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Numeric form of every value in a Series.
///
/// Numeric columns are cast directly. Text columns go through
/// [`parse_numeric_string`], so `"1,234"` becomes `1234.0` and `"N/A"` null.
pub fn f64_values(series: &Series) -> Result<Vec<Option<f64>>> {
    if is_numeric_dtype(series.dtype()) || series.dtype() == &DataType::Boolean {
        let cast = series.cast(&DataType::Float64)?;
        let chunked = cast.f64()?;
        return Ok(chunked.into_iter().collect());
    }

    Ok(text_values(series)?
        .into_iter()
        .map(|v| v.as_deref().and_then(parse_numeric_string))
        .collect())
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters stripped before numeric parsing (thousands separators).
pub const THOUSANDS_SEPARATORS: [char; 1] = [','];

/// Clean a string for numeric parsing.
///
/// Removes thousands separators and surrounding whitespace.
///
/// ```rust
/// use wsl_processing::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string(" 1,234 "), "1234");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    s.replace(THOUSANDS_SEPARATORS, "").trim().to_string()
}

/// Try to parse a string as a numeric value (f64).
///
/// Returns `None` for empty strings, non-numeric text and `NaN`.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Round a value to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// =============================================================================
// Tests
// =============================================================================
