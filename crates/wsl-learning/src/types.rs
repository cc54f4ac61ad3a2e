//! Result types returned by [`fit_linear_model`](crate::fit_linear_model).

use crate::metrics::RegressionMetrics;
use crate::model::AttendanceModel;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Everything produced by one forecasting run.
///
/// The partition frames carry every input column plus
/// `Predicted_Attendance`, with output typing applied.
#[derive(Debug)]
#[non_exhaustive]
pub struct ForecastResult {
    /// The fitted regression.
    pub model: AttendanceModel,

    /// Features used, in design-matrix order (never contains `Season`).
    pub features: Vec<String>,

    /// Rows with `Season < split_year`.
    pub train_df: DataFrame,

    /// Rows with `Season >= split_year`.
    pub test_df: DataFrame,

    /// Extrapolated seasons; `None` when no forecast years were requested.
    pub future_df: Option<DataFrame>,

    /// One-row metrics frame labelled `Train`.
    pub train_metrics_df: DataFrame,

    /// One-row metrics frame labelled `Test`.
    pub test_metrics_df: DataFrame,

    /// Train and test metrics stacked.
    pub combined_metrics_df: DataFrame,

    /// Train metrics as a struct.
    pub train_metrics: RegressionMetrics,

    /// Test metrics as a struct.
    pub test_metrics: RegressionMetrics,
}

impl ForecastResult {
    /// Serialisable view of the fit for reports.
    pub fn summary(&self) -> ForecastSummary {
        ForecastSummary {
            features: self.features.clone(),
            coefficients: self.model.coefficients(),
            intercept: self.model.intercept(),
            train_rows: self.train_df.height(),
            test_rows: self.test_df.height(),
            future_rows: self.future_df.as_ref().map_or(0, DataFrame::height),
            train: self.train_metrics,
            test: self.test_metrics,
        }
    }
}

static_assertions::assert_impl_all!(ForecastResult: Send);

/// Plain-data summary of a [`ForecastResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub features: Vec<String>,
    pub coefficients: Vec<(String, f64)>,
    pub intercept: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub future_rows: usize,
    pub train: RegressionMetrics,
    pub test: RegressionMetrics,
}
