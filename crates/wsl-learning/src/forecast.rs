//! Chronological train/test fit, evaluation and extrapolation.

use crate::config::{ForecastConfig, PREDICTION_COLUMN, SEASON_COLUMN};
use crate::error::{LearningError, Result};
use crate::extrapolate::extrapolate_clubs;
use crate::metrics::RegressionMetrics;
use crate::model::{AttendanceModel, numeric_values};
use crate::postprocess::enforce_types;
use crate::types::ForecastResult;
use polars::prelude::*;
use tracing::{debug, info};

/// Fit the attendance model on seasons before `split_year` and evaluate it on the rest.
///
/// Rows without a `Season` are left out of both partitions. `Season` and
/// repeated names are dropped from the feature list however the config was
/// built.
///
/// # Errors
///
/// - [`LearningError::InvalidConfig`](crate::LearningError::InvalidConfig)
///   when no feature other than `Season` is given
/// - [`LearningError::ColumnNotFound`](crate::LearningError::ColumnNotFound)
///   for a missing `Season`, target or feature column
/// - [`LearningError::TrainingFailed`](crate::LearningError::TrainingFailed)
///   when the training partition has no complete rows
pub fn fit_linear_model(model_df: &DataFrame, config: &ForecastConfig) -> Result<ForecastResult> {
    let features = &config.regressors();
    let target = config.target_column.as_str();
    if features.is_empty() {
        return Err(LearningError::InvalidConfig(
            "at least one feature column other than Season is required".to_string(),
        ));
    }

    let seasons = numeric_values(model_df, SEASON_COLUMN)?;
    numeric_values(model_df, target)?;

    let split = f64::from(config.split_year);
    let in_train: Vec<bool> = seasons.iter().map(|s| s.is_some_and(|s| s < split)).collect();
    let in_test: Vec<bool> = seasons.iter().map(|s| s.is_some_and(|s| s >= split)).collect();

    let unassigned = seasons.iter().filter(|s| s.is_none()).count();
    if unassigned > 0 {
        debug!("{} rows without a Season excluded from both partitions", unassigned);
    }

    let mut train_df = model_df.filter(&BooleanChunked::from_slice("train".into(), &in_train))?;
    let mut test_df = model_df.filter(&BooleanChunked::from_slice("test".into(), &in_test))?;
    info!(
        "Split at {}: {} train rows, {} test rows",
        config.split_year,
        train_df.height(),
        test_df.height()
    );

    let model = AttendanceModel::fit(&train_df, features, target)?;

    let train_predicted = model.predict(&train_df)?;
    let test_predicted = model.predict(&test_df)?;

    let train_metrics =
        RegressionMetrics::compute(&numeric_values(&train_df, target)?, &train_predicted);
    let test_metrics =
        RegressionMetrics::compute(&numeric_values(&test_df, target)?, &test_predicted);
    info!(
        "Train R2 {:.3}, test R2 {:.3}, test MAE {:.1}",
        train_metrics.r2, test_metrics.r2, test_metrics.mae
    );

    train_df.with_column(Series::new(PREDICTION_COLUMN.into(), train_predicted))?;
    test_df.with_column(Series::new(PREDICTION_COLUMN.into(), test_predicted))?;

    let future_df = if config.forecast_years > 0 {
        let future = extrapolate_clubs(model_df, features, target, config.forecast_years)?;
        Some(enforce_types(future)?)
    } else {
        None
    };

    let train_metrics_df = train_metrics.to_frame("Train")?;
    let test_metrics_df = test_metrics.to_frame("Test")?;
    let combined_metrics_df = train_metrics_df.vstack(&test_metrics_df)?;

    Ok(ForecastResult {
        model,
        features: features.clone(),
        train_df: enforce_types(train_df)?,
        test_df: enforce_types(test_df)?,
        future_df,
        train_metrics_df,
        test_metrics_df,
        combined_metrics_df,
        train_metrics,
        test_metrics,
    })
}
