//! Output typing for forecast tables.
//!
//! Count-like columns come back from the regression pipeline as floats. They
//! are rounded to whole numbers and stored as nullable `Int64`; every other
//! float column is rounded to two decimal places.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;
use wsl_processing::utils::{f64_values, is_float_dtype, is_numeric_dtype, round_to};

/// Columns published as whole numbers.
pub const INTEGER_COLUMNS: &[&str] = &[
    "Matches",
    "Wins",
    "Draws",
    "Losses",
    "Goals_For",
    "Goals_Against",
    "Goal_Difference",
    "Points",
    "Top_Scorer_Goals",
    "Eng_Num_Players",
    "FIFA_Ranking",
    "Capacity",
    "years_since_euro",
];

/// Apply output typing to every column of `df`.
///
/// Non-numeric columns and integer columns outside [`INTEGER_COLUMNS`] are
/// left untouched. NaN becomes null in integer columns.
pub fn enforce_types(mut df: DataFrame) -> Result<DataFrame> {
    let columns: Vec<Series> = df
        .get_columns()
        .iter()
        .map(|column| column.as_materialized_series().clone())
        .collect();

    for series in columns {
        let name = series.name().to_string();
        let dtype = series.dtype().clone();

        if INTEGER_COLUMNS.contains(&name.as_str()) && is_numeric_dtype(&dtype) {
            let whole: Vec<Option<i64>> = f64_values(&series)?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()).map(|x| x.round() as i64))
                .collect();
            df.with_column(Series::new(name.as_str().into(), whole))?;
        } else if is_float_dtype(&dtype) {
            let rounded: Vec<Option<f64>> = f64_values(&series)?
                .into_iter()
                .map(|v| v.map(|x| round_to(x, 2)))
                .collect();
            df.with_column(Series::new(name.as_str().into(), rounded))?;
        } else {
            continue;
        }
        debug!("Enforced output type for {} (was {})", name, dtype);
    }

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wsl_processing::utils::{require_column, text_values};

    #[test]
    fn test_integer_and_float_columns() {
        let df = df! {
            "Club" => &["Arsenal", "Chelsea"],
            "Points" => &[Some(45.6), None],
            "Capacity" => &[5000.0, 4850.4],
            "Attendance" => &[2710.456, 4016.0],
            "Rank" => &[1i64, 2],
        }
        .unwrap();

        let typed = enforce_types(df).unwrap();

        let points = require_column(&typed, "Points").unwrap();
        assert_eq!(points.dtype(), &DataType::Int64);
        let points: Vec<Option<i64>> = points.i64().unwrap().into_iter().collect();
        assert_eq!(points, vec![Some(46), None]);

        let capacity: Vec<Option<i64>> = require_column(&typed, "Capacity")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(capacity, vec![Some(5000), Some(4850)]);

        let attendance = f64_values(require_column(&typed, "Attendance").unwrap()).unwrap();
        assert_eq!(attendance, vec![Some(2710.46), Some(4016.0)]);

        assert_eq!(require_column(&typed, "Rank").unwrap().dtype(), &DataType::Int64);
        assert_eq!(
            text_values(require_column(&typed, "Club").unwrap()).unwrap()[0].as_deref(),
            Some("Arsenal")
        );
    }

    #[test]
    fn test_column_order_is_kept() {
        let df = df! { "Capacity" => &[1.0], "Club" => &["A"], "Points" => &[2.0] }.unwrap();
        let typed = enforce_types(df).unwrap();
        let names: Vec<String> = typed
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Capacity", "Club", "Points"]);
    }

    #[test]
    fn test_nan_integer_becomes_null() {
        let df = df! { "Wins" => &[f64::NAN, 3.0] }.unwrap();
        let typed = enforce_types(df).unwrap();
        let wins: Vec<Option<i64>> = require_column(&typed, "Wins")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(wins, vec![None, Some(3)]);
    }
}
