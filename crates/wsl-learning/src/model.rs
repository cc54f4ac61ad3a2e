//! Ordinary least squares fit over selected feature columns.

use crate::error::{LearningError, Result};
use crate::features::CLUB_DUMMY_PREFIX;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};
use wsl_processing::utils::{f64_values, has_column, is_numeric_dtype, require_column};

/// Numeric values of `column`, with NaN treated as missing.
///
/// # Errors
///
/// - [`LearningError::ColumnNotFound`] if the column is absent
/// - [`LearningError::InvalidData`] if it is neither numeric nor boolean
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    if !has_column(df, column) {
        return Err(LearningError::ColumnNotFound(column.to_string()));
    }
    let series = require_column(df, column)?;
    if !is_numeric_dtype(series.dtype()) && series.dtype() != &DataType::Boolean {
        return Err(LearningError::InvalidData(format!(
            "column '{column}' has non-numeric type {}",
            series.dtype()
        )));
    }
    Ok(f64_values(series)?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Row-major feature values; `None` for any row with a missing feature.
pub(crate) fn feature_rows(df: &DataFrame, features: &[String]) -> Result<Vec<Option<Vec<f64>>>> {
    let columns = features
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect())
}

/// Design matrix from the `columns` of each row.
fn to_matrix(rows: &[&Vec<f64>], columns: &[usize]) -> Result<Array2<f64>> {
    let flat: Vec<f64> = rows
        .iter()
        .flat_map(|row| columns.iter().map(|&c| row[c]))
        .collect();
    Array2::from_shape_vec((rows.len(), columns.len()), flat)
        .map_err(|e| LearningError::InvalidData(format!("Failed to create feature matrix: {e}")))
}

/// Club indicator columns among `active` that sum to one on every row.
///
/// Such a set duplicates the intercept, so one of them is left out of the
/// solve and the rest are re-centred afterwards.
fn spanning_indicators(features: &[String], active: &[usize], rows: &[&Vec<f64>]) -> Vec<usize> {
    let indicators: Vec<usize> = active
        .iter()
        .copied()
        .filter(|&c| features[c].starts_with(CLUB_DUMMY_PREFIX))
        .collect();
    let spans = !indicators.is_empty()
        && rows.iter().all(|row| {
            let sum: f64 = indicators.iter().map(|&c| row[c]).sum();
            (sum - 1.0).abs() < 1e-9
        });
    if spans { indicators } else { Vec::new() }
}

/// A fitted linear regression with an intercept.
///
/// Coefficients are the minimum-norm least squares solution for the features
/// the data can tell apart:
///
/// - a feature that is zero on every training row (the indicator of a club
///   first seen after the split) gets a coefficient of zero, so such a club is
///   predicted from the intercept and its other features;
/// - when the club indicators cover every training row they are collinear
///   with the intercept; their coefficients are shifted to sum to zero and
///   the intercept absorbs the shift.
pub struct AttendanceModel {
    features: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    n_train_rows: usize,
}

impl AttendanceModel {
    /// Fit `target ~ features` on the rows of `df` where all of them are present.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::TrainingFailed`] when no complete rows remain
    /// or the solver cannot produce finite coefficients.
    pub fn fit(df: &DataFrame, features: &[String], target: &str) -> Result<Self> {
        let rows = feature_rows(df, features)?;
        let targets = numeric_values(df, target)?;

        let (x_rows, y): (Vec<&Vec<f64>>, Vec<f64>) = rows
            .iter()
            .zip(&targets)
            .filter_map(|(row, y)| Some((row.as_ref()?, (*y)?)))
            .unzip();

        let skipped = df.height() - y.len();
        if skipped > 0 {
            debug!("Skipping {} training rows with missing values", skipped);
        }
        if y.is_empty() {
            return Err(LearningError::TrainingFailed(format!(
                "no training rows with a complete '{target}' and feature set"
            )));
        }

        let active: Vec<usize> = (0..features.len())
            .filter(|&c| x_rows.iter().any(|row| row[c] != 0.0))
            .collect();
        for (c, name) in features.iter().enumerate() {
            if !active.contains(&c) {
                debug!("{} is zero on every training row; coefficient fixed at 0", name);
            }
        }

        let indicators = spanning_indicators(features, &active, &x_rows);
        let reference = indicators.last().copied();
        let design: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&c| Some(c) != reference)
            .collect();

        let mut coefficients = vec![0.0; features.len()];
        let mut intercept = y.iter().sum::<f64>() / y.len() as f64;

        if design.is_empty() {
            warn!("No feature varies over the training rows; fitting the intercept only");
        } else {
            let dataset = Dataset::new(to_matrix(&x_rows, &design)?, Array1::from(y.clone()));
            let fitted = LinearRegression::new()
                .with_intercept(true)
                .fit(&dataset)
                .map_err(|e| {
                    LearningError::TrainingFailed(format!("Linear regression failed: {e}"))
                })?;
            for (&c, &param) in design.iter().zip(fitted.params().iter()) {
                coefficients[c] = param;
            }
            intercept = fitted.intercept();
        }

        if !indicators.is_empty() {
            let shift =
                indicators.iter().map(|&c| coefficients[c]).sum::<f64>() / indicators.len() as f64;
            for &c in &indicators {
                coefficients[c] -= shift;
            }
            intercept += shift;
            debug!("Club indicators re-centred by {:.2}", shift);
        }

        if coefficients.iter().any(|p| !p.is_finite()) || !intercept.is_finite() {
            return Err(LearningError::TrainingFailed(
                "design matrix is rank deficient; remove collinear features".to_string(),
            ));
        }

        info!(
            "Fitted linear model on {} rows with {} features",
            y.len(),
            features.len()
        );

        Ok(Self {
            features: features.to_vec(),
            coefficients,
            intercept,
            n_train_rows: y.len(),
        })
    }

    /// Predict every row of `df`; rows with a missing feature get `None`.
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<Option<f64>>> {
        Ok(feature_rows(df, &self.features)?
            .into_iter()
            .map(|row| {
                row.map(|values| {
                    values
                        .iter()
                        .zip(&self.coefficients)
                        .fold(self.intercept, |acc, (x, b)| acc + x * b)
                })
            })
            .collect())
    }

    /// Feature names in design-matrix order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// `(feature, coefficient)` pairs in design-matrix order.
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.features
            .iter()
            .cloned()
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    /// Constant term.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of complete rows the model was trained on.
    pub fn n_train_rows(&self) -> usize {
        self.n_train_rows
    }
}

impl fmt::Debug for AttendanceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttendanceModel")
            .field("coefficients", &self.coefficients())
            .field("intercept", &self.intercept)
            .field("n_train_rows", &self.n_train_rows)
            .finish()
    }
}
