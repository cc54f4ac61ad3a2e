//! Column-level operations: renaming, composite keys, numeric coercion, dropping.

use crate::error::{ProcessingError, Result};
use crate::utils::{f64_values, has_column, require_column, text_values};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Rename columns per `{old: new}`.
///
/// Columns without an entry pass through unchanged; keys naming no column are
/// ignored. All renames apply at once, so swapping two names is allowed.
pub fn convert_column_names(df: DataFrame, mapping: &HashMap<String, String>) -> Result<DataFrame> {
    let mut columns: Vec<Column> = df.get_columns().to_vec();
    for column in columns.iter_mut() {
        if let Some(new_name) = mapping.get(column.name().as_str()) {
            column.rename(new_name.as_str().into());
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Build `new_column` by joining the text of `columns` with `_`, in order.
///
/// Every listed column must exist. Null cells contribute an empty string.
pub fn create_unique_id(mut df: DataFrame, columns: &[&str], new_column: &str) -> Result<DataFrame> {
    let parts: Vec<Vec<Option<String>>> = columns
        .iter()
        .map(|name| text_values(require_column(&df, name)?))
        .collect::<Result<_>>()?;

    let ids: Vec<String> = (0..df.height())
        .map(|row| {
            parts
                .iter()
                .map(|col| col[row].as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join("_")
        })
        .collect();

    df.with_column(Series::new(new_column.into(), ids))?;
    Ok(df)
}

/// Parse `columns` as numbers.
///
/// Thousands separators and surrounding whitespace are stripped first. Values
/// that still fail to parse become null.
pub fn convert_to_numeric(mut df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    for name in columns {
        let parsed = f64_values(require_column(&df, name)?)?;
        let failed = parsed.iter().filter(|v| v.is_none()).count();
        debug!("Parsed '{}' as numeric ({} null values)", name, failed);
        df.with_column(Series::new((*name).into(), parsed))?;
    }
    Ok(df)
}

/// Drop `columns`, ignoring names that are not present.
pub fn drop_columns(df: DataFrame, columns: &[&str]) -> DataFrame {
    let present: Vec<PlSmallStr> = columns
        .iter()
        .filter(|name| has_column(&df, name))
        .map(|name| (*name).into())
        .collect();

    if present.is_empty() {
        return df;
    }
    df.drop_many(present)
}

/// Fail with `ColumnNotFound` naming the first absent column.
pub fn ensure_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    match columns.iter().find(|name| !has_column(df, name)) {
        Some(missing) => Err(ProcessingError::ColumnNotFound((*missing).to_string())),
        None => Ok(()),
    }
}
