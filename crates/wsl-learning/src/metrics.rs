//! Regression metrics for one partition of the model input.
//!
//! All metrics are computed over rows where both the actual value and the
//! prediction are present. An empty partition yields NaN everywhere.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column of the metrics frames naming the partition (`Train` / `Test`).
pub const SET_COLUMN: &str = "Set";

/// Metric names in report order.
pub const METRIC_NAMES: [&str; 10] = [
    "MAE",
    "MSE",
    "RMSE",
    "R2",
    "ExplainedVariance",
    "MaxError",
    "PctWithin10pct",
    "PctWithin15pct",
    "PctWithin500Attendees",
    "PctWithin1000Attendees",
];

/// Evaluation metrics for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegressionMetrics {
    /// Number of rows with both an actual value and a prediction.
    #[serde(rename = "Rows")]
    pub n_rows: usize,
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "MSE")]
    pub mse: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "R2")]
    pub r2: f64,
    pub explained_variance: f64,
    pub max_error: f64,
    /// Share of rows whose relative error is at most 10%.
    #[serde(rename = "PctWithin10pct")]
    pub pct_within_10pct: f64,
    /// Share of rows whose relative error is at most 15%.
    #[serde(rename = "PctWithin15pct")]
    pub pct_within_15pct: f64,
    /// Share of rows within 500 attendees.
    #[serde(rename = "PctWithin500Attendees")]
    pub pct_within_500: f64,
    /// Share of rows within 1000 attendees.
    #[serde(rename = "PctWithin1000Attendees")]
    pub pct_within_1000: f64,
}

impl RegressionMetrics {
    /// Score `predicted` against `actual`, skipping rows where either is missing.
    pub fn compute(actual: &[Option<f64>], predicted: &[Option<f64>]) -> Self {
        let pairs: Vec<(f64, f64)> = actual
            .iter()
            .zip(predicted)
            .filter_map(|(a, p)| Some(((*a)?, (*p)?)))
            .collect();

        if pairs.is_empty() {
            return Self::empty();
        }

        let n = pairs.len() as f64;
        let errors: Vec<f64> = pairs.iter().map(|(a, p)| a - p).collect();
        let actuals: Vec<f64> = pairs.iter().map(|(a, _)| *a).collect();

        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let max_error = errors.iter().map(|e| e.abs()).fold(0.0, f64::max);

        let actual_mean = mean(&actuals);
        let ss_tot: f64 = actuals.iter().map(|a| (a - actual_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e * e).sum();
        let r2 = score_ratio(ss_res, ss_tot);

        let error_mean = mean(&errors);
        let error_var: f64 = errors.iter().map(|e| (e - error_mean).powi(2)).sum();
        let explained_variance = score_ratio(error_var, ss_tot);

        // (a - p) / a is non-finite when a == 0 and never counts as within.
        let relative = |a: f64, p: f64| ((a - p) / a).abs();

        Self {
            n_rows: pairs.len(),
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
            explained_variance,
            max_error,
            pct_within_10pct: share(&pairs, |a, p| relative(a, p) <= 0.10),
            pct_within_15pct: share(&pairs, |a, p| relative(a, p) <= 0.15),
            pct_within_500: share(&pairs, |a, p| (a - p).abs() <= 500.0),
            pct_within_1000: share(&pairs, |a, p| (a - p).abs() <= 1000.0),
        }
    }

    fn empty() -> Self {
        Self {
            n_rows: 0,
            mae: f64::NAN,
            mse: f64::NAN,
            rmse: f64::NAN,
            r2: f64::NAN,
            explained_variance: f64::NAN,
            max_error: f64::NAN,
            pct_within_10pct: f64::NAN,
            pct_within_15pct: f64::NAN,
            pct_within_500: f64::NAN,
            pct_within_1000: f64::NAN,
        }
    }

    /// Metric values in [`METRIC_NAMES`] order.
    pub fn values(&self) -> [f64; 10] {
        [
            self.mae,
            self.mse,
            self.rmse,
            self.r2,
            self.explained_variance,
            self.max_error,
            self.pct_within_10pct,
            self.pct_within_15pct,
            self.pct_within_500,
            self.pct_within_1000,
        ]
    }

    /// One-row frame: a [`SET_COLUMN`] label followed by one column per metric.
    pub fn to_frame(&self, set: &str) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(METRIC_NAMES.len() + 1);
        columns.push(Series::new(SET_COLUMN.into(), [set]).into());
        for (name, value) in METRIC_NAMES.iter().zip(self.values()) {
            columns.push(Series::new((*name).into(), [value]).into());
        }
        DataFrame::new(columns)
    }
}

/// 1 - numerator / denominator, with a constant actual series scoring
/// 1.0 on a perfect fit and 0.0 otherwise.
fn score_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        if numerator == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - numerator / denominator
    }
}

/// Fraction of `(actual, predicted)` pairs accepted by `within`.
fn share(pairs: &[(f64, f64)], within: impl Fn(f64, f64) -> bool) -> f64 {
    pairs.iter().filter(|(a, p)| within(*a, *p)).count() as f64 / pairs.len() as f64
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
