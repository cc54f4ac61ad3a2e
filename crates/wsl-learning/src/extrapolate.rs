//! Per-club extrapolation of the target past the last observed season.
//!
//! Each club's history is its rows in season order. The forecast compounds the
//! median season-over-season growth of the target from the last observed
//! value. Clubs seen in fewer than two seasons get placeholder rows with no
//! forecast.

use crate::config::{PREDICTION_COLUMN, SEASON_COLUMN};
use crate::error::{LearningError, Result};
use crate::features::{CLUB_DUMMY_PREFIX, club_dummy_columns};
use crate::model::numeric_values;
use polars::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, info, warn};
use wsl_processing::utils::has_column;

const CAPACITY_COLUMN: &str = "Capacity";

/// Median of `values`; `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Median period-over-period growth of an ordered history.
///
/// Pairs with a missing value, and growth off a zero base, are skipped.
pub fn median_growth(history: &[Option<f64>]) -> Option<f64> {
    let growths: Vec<f64> = history
        .windows(2)
        .filter_map(|pair| {
            let (previous, current) = (pair[0]?, pair[1]?);
            let growth = (current - previous) / previous;
            growth.is_finite().then_some(growth)
        })
        .collect();
    median(&growths)
}

/// `last * (1 + growth)^k` for `k = 1..=years`.
pub fn compound(last: f64, growth: f64, years: u32) -> Vec<f64> {
    let mut value = last;
    (0..years)
        .map(|_| {
            value *= 1.0 + growth;
            value
        })
        .collect()
}

/// One synthetic season for one club.
struct FutureRow {
    season: i32,
    club: usize,
    features: Vec<Option<f64>>,
    capacity: Option<f64>,
    prediction: Option<f64>,
}

/// Future rows for every club dummy column of `model_df`.
///
/// Output columns: `Season`, `Club`, the non-indicator features, every
/// `Club_` indicator, `Capacity`, the (null) target and
/// `Predicted_Attendance`.
///
/// # Errors
///
/// Returns [`LearningError::InvalidData`] when `model_df` has no `Season`
/// values, and [`LearningError::ColumnNotFound`] for a missing feature or
/// target column.
pub fn extrapolate_clubs(
    model_df: &DataFrame,
    features: &[String],
    target: &str,
    forecast_years: u32,
) -> Result<DataFrame> {
    let seasons = numeric_values(model_df, SEASON_COLUMN)?;
    let last_season = seasons
        .iter()
        .flatten()
        .copied()
        .fold(None, |max: Option<f64>, s| Some(max.map_or(s, |m| m.max(s))))
        .ok_or_else(|| LearningError::InvalidData("no Season values to forecast from".to_string()))?
        as i32;
    let years: Vec<i32> = (1..=forecast_years as i32).map(|k| last_season + k).collect();

    let club_columns = club_dummy_columns(model_df);
    if club_columns.is_empty() {
        warn!("No {}* columns found; nothing to forecast", CLUB_DUMMY_PREFIX);
    }

    // Indicators and capacity are filled per club, not carried as features.
    let carried: Vec<&String> = features
        .iter()
        .filter(|f| !f.starts_with(CLUB_DUMMY_PREFIX) && f.as_str() != CAPACITY_COLUMN)
        .collect();
    let carried_values = carried
        .iter()
        .map(|name| numeric_values(model_df, name))
        .collect::<Result<Vec<_>>>()?;
    let targets = numeric_values(model_df, target)?;
    let capacity = if has_column(model_df, CAPACITY_COLUMN) {
        numeric_values(model_df, CAPACITY_COLUMN)?
    } else {
        vec![None; model_df.height()]
    };

    let mut rows: Vec<FutureRow> = Vec::new();
    for (club, column) in club_columns.iter().enumerate() {
        let mut history: Vec<usize> = numeric_values(model_df, column)?
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag == Some(1.0))
            .map(|(row, _)| row)
            .collect();
        history.sort_by(|a, b| {
            seasons[*a]
                .partial_cmp(&seasons[*b])
                .unwrap_or(Ordering::Equal)
        });

        let last_capacity = history.last().and_then(|&row| capacity[row]);

        if history.len() < 2 {
            debug!("{} has {} season(s) of history; no forecast", column, history.len());
            rows.extend(years.iter().map(|&season| FutureRow {
                season,
                club,
                features: vec![None; carried.len()],
                capacity: last_capacity,
                prediction: None,
            }));
            continue;
        }

        let last_row = history[history.len() - 1];
        let club_targets: Vec<Option<f64>> = history.iter().map(|&row| targets[row]).collect();
        let last_observed = club_targets.iter().rev().flatten().next().copied();

        let predictions: Vec<Option<f64>> = match (last_observed, median_growth(&club_targets)) {
            (Some(last), Some(growth)) => {
                debug!("{}: median growth {:.4} from {:.0}", column, growth, last);
                compound(last, growth, forecast_years)
                    .into_iter()
                    .map(Some)
                    .collect()
            }
            _ => {
                warn!("{} has no usable {} history; forecast left empty", column, target);
                vec![None; years.len()]
            }
        };

        let last_features: Vec<Option<f64>> =
            carried_values.iter().map(|values| values[last_row]).collect();
        rows.extend(years.iter().zip(predictions).map(|(&season, prediction)| FutureRow {
            season,
            club,
            features: last_features.clone(),
            capacity: capacity[last_row],
            prediction,
        }));
    }

    info!(
        "Extrapolated {} rows for {} clubs over {} season(s)",
        rows.len(),
        club_columns.len(),
        years.len()
    );
    build_frame(&rows, &club_columns, &carried, target)
}

fn build_frame(
    rows: &[FutureRow],
    club_columns: &[String],
    carried: &[&String],
    target: &str,
) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::new();

    let seasons: Vec<i32> = rows.iter().map(|r| r.season).collect();
    columns.push(Series::new(SEASON_COLUMN.into(), seasons).into());

    let clubs: Vec<&str> = rows
        .iter()
        .map(|r| {
            club_columns[r.club]
                .strip_prefix(CLUB_DUMMY_PREFIX)
                .unwrap_or(&club_columns[r.club])
        })
        .collect();
    columns.push(Series::new("Club".into(), clubs).into());

    for (i, name) in carried.iter().enumerate() {
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.features[i]).collect();
        columns.push(Series::new(name.as_str().into(), values).into());
    }

    for (club, name) in club_columns.iter().enumerate() {
        let flags: Vec<i32> = rows.iter().map(|r| i32::from(r.club == club)).collect();
        columns.push(Series::new(name.as_str().into(), flags).into());
    }

    let capacity: Vec<Option<f64>> = rows.iter().map(|r| r.capacity).collect();
    columns.push(Series::new(CAPACITY_COLUMN.into(), capacity).into());

    columns.push(Series::full_null(target.into(), rows.len(), &DataType::Float64).into());

    let predictions: Vec<Option<f64>> = rows.iter().map(|r| r.prediction).collect();
    columns.push(Series::new(PREDICTION_COLUMN.into(), predictions).into());

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wsl_processing::utils::{f64_values, require_column, text_values};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn values(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
        f64_values(require_column(df, column).unwrap()).unwrap()
    }

    fn model_df() -> DataFrame {
        df! {
            "Season" => &[2019i32, 2020, 2021, 2021],
            "Club" => &["Arsenal", "Arsenal", "Arsenal", "Reading"],
            "Points" => &[40.0, 45.0, 50.0, 20.0],
            "Capacity" => &[Some(5000.0), Some(5000.0), Some(6000.0), None],
            "Attendance" => &[30000.0, 33000.0, 36000.0, 900.0],
            "Club_Arsenal" => &[1i32, 1, 1, 0],
            "Club_Reading" => &[0i32, 0, 0, 1],
        }
        .unwrap()
    }

    fn features() -> Vec<String> {
        ["Points", "Capacity", "Club_Arsenal", "Club_Reading"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_median_growth_skips_gaps() {
        let history = [Some(100.0), None, Some(120.0), Some(150.0)];
        // Only 120 -> 150 is a complete pair.
        assert_eq!(median_growth(&history), Some(0.25));
        assert_eq!(median_growth(&[Some(0.0), Some(10.0)]), None);
        assert_eq!(median_growth(&[Some(10.0)]), None);
    }

    #[test]
    fn test_negative_growth_is_kept() {
        let growth = median_growth(&[Some(1000.0), Some(800.0)]).unwrap();
        assert!(approx(growth, -0.2));
        let forecast = compound(800.0, growth, 2);
        assert!(approx(forecast[0], 640.0));
        assert!(approx(forecast[1], 512.0));
    }

    #[test]
    fn test_regular_club_compounds_median_growth() {
        let future = extrapolate_clubs(&model_df(), &features(), "Attendance", 2).unwrap();

        let growth = (0.1 + 3000.0 / 33000.0) / 2.0;
        let predictions = values(&future, PREDICTION_COLUMN);
        assert!(approx(predictions[0].unwrap(), 36000.0 * (1.0 + growth)));
        assert!(approx(predictions[1].unwrap(), 36000.0 * (1.0 + growth).powi(2)));

        assert_eq!(values(&future, "Season")[..2].to_vec(), vec![Some(2022.0), Some(2023.0)]);
        assert_eq!(values(&future, "Points")[..2].to_vec(), vec![Some(50.0), Some(50.0)]);
        assert_eq!(values(&future, "Capacity")[..2].to_vec(), vec![Some(6000.0), Some(6000.0)]);
        assert_eq!(values(&future, "Attendance")[..2].to_vec(), vec![None::<f64>; 2]);
    }

    #[test]
    fn test_single_season_club_has_no_forecast() {
        let future = extrapolate_clubs(&model_df(), &features(), "Attendance", 2).unwrap();
        assert_eq!(future.height(), 4);

        let clubs = text_values(require_column(&future, "Club").unwrap()).unwrap();
        assert_eq!(clubs[2].as_deref(), Some("Reading"));

        assert_eq!(values(&future, PREDICTION_COLUMN)[2..].to_vec(), vec![None::<f64>; 2]);
        assert_eq!(values(&future, "Points")[2..].to_vec(), vec![None::<f64>; 2]);
        assert_eq!(values(&future, "Club_Reading")[2..].to_vec(), vec![Some(1.0); 2]);
        assert_eq!(values(&future, "Club_Arsenal")[2..].to_vec(), vec![Some(0.0); 2]);
    }

    #[test]
    fn test_rows_sorted_by_season_before_growth() {
        let df = df! {
            "Season" => &[2021i32, 2019, 2020],
            "Attendance" => &[36000.0, 30000.0, 33000.0],
            "Club_Arsenal" => &[1i32, 1, 1],
        }
        .unwrap();
        let future = extrapolate_clubs(&df, &["Club_Arsenal".to_string()], "Attendance", 1).unwrap();

        let growth = (0.1 + 3000.0 / 33000.0) / 2.0;
        assert!(approx(
            values(&future, PREDICTION_COLUMN)[0].unwrap(),
            36000.0 * (1.0 + growth)
        ));
        // No Capacity column in the input: still present, all null.
        assert_eq!(values(&future, "Capacity"), vec![None::<f64>]);
    }

    #[test]
    fn test_no_seasons() {
        let df = df! {
            "Season" => &[None::<i32>],
            "Attendance" => &[1.0],
            "Club_A" => &[1i32],
        }
        .unwrap();
        let err = extrapolate_clubs(&df, &["Club_A".to_string()], "Attendance", 1).unwrap_err();
        assert!(matches!(err, LearningError::InvalidData(_)));
    }
}
