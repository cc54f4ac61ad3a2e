//! Configuration for attendance forecasting.
//!
//! # Example
//!
//! ```
//! use wsl_learning::ForecastConfig;
//!
//! let config = ForecastConfig::builder()
//!     .feature_columns(["Points", "Capacity", "Season"])
//!     .split_year(2022)
//!     .forecast_years(3)
//!     .build()
//!     .expect("valid config");
//!
//! // Season is the split key, never a regressor.
//! assert_eq!(config.feature_columns, vec!["Points", "Capacity"]);
//! ```

use crate::error::LearningError;
use serde::{Deserialize, Serialize};

/// Column holding the season start year in model input frames.
pub const SEASON_COLUMN: &str = "Season";

/// Column added to every partition with the model's output.
pub const PREDICTION_COLUMN: &str = "Predicted_Attendance";

/// Configuration for [`fit_linear_model`](crate::fit_linear_model).
///
/// Use [`ForecastConfig::builder()`] to construct a validated configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Regressor columns, in the order they enter the design matrix.
    ///
    /// `Season` is always removed.
    pub feature_columns: Vec<String>,

    /// Column to predict (default: "Attendance").
    pub target_column: String,

    /// First season start year of the test partition (default: 2022).
    ///
    /// Rows with `Season < split_year` train the model.
    pub split_year: i32,

    /// Number of seasons to extrapolate past the last observed one (default: 0).
    pub forecast_years: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            feature_columns: Vec::new(),
            target_column: "Attendance".to_string(),
            split_year: 2022,
            forecast_years: 0,
        }
    }
}

impl ForecastConfig {
    /// Create a new builder for `ForecastConfig`.
    #[must_use]
    pub fn builder() -> ForecastConfigBuilder {
        ForecastConfigBuilder::default()
    }

    /// Feature columns without `Season` and without repeats, in first-seen order.
    ///
    /// Applies to configs built as literals or deserialized, which skip the builder.
    pub fn regressors(&self) -> Vec<String> {
        regressors(&self.feature_columns)
    }
}

fn regressors(columns: &[String]) -> Vec<String> {
    let mut features: Vec<String> = Vec::with_capacity(columns.len());
    for column in columns {
        if column != SEASON_COLUMN && !features.contains(column) {
            features.push(column.clone());
        }
    }
    features
}

/// Builder for [`ForecastConfig`].
#[derive(Debug, Clone, Default)]
pub struct ForecastConfigBuilder {
    config: ForecastConfig,
}

impl ForecastConfigBuilder {
    /// Set the regressor columns.
    #[must_use]
    pub fn feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.feature_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the target column name.
    #[must_use]
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.config.target_column = column.into();
        self
    }

    /// Set the train/test split year.
    #[must_use]
    pub fn split_year(mut self, year: i32) -> Self {
        self.config.split_year = year;
        self
    }

    /// Set how many future seasons to extrapolate.
    #[must_use]
    pub fn forecast_years(mut self, years: u32) -> Self {
        self.config.forecast_years = years;
        self
    }

    /// Build the configuration.
    ///
    /// `Season` and duplicate names are dropped from the feature list.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] if:
    /// - the target column name is empty
    /// - no feature columns remain
    /// - the target column is also listed as a feature
    pub fn build(mut self) -> Result<ForecastConfig, LearningError> {
        self.config.feature_columns = regressors(&self.config.feature_columns);

        if self.config.target_column.trim().is_empty() {
            return Err(LearningError::InvalidConfig(
                "target_column must not be empty".to_string(),
            ));
        }

        if self.config.feature_columns.is_empty() {
            return Err(LearningError::InvalidConfig(
                "at least one feature column other than Season is required".to_string(),
            ));
        }

        if self.config.feature_columns.contains(&self.config.target_column) {
            return Err(LearningError::InvalidConfig(format!(
                "target column '{}' cannot also be a feature",
                self.config.target_column
            )));
        }

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::builder()
            .feature_columns(["Points"])
            .build()
            .unwrap();
        assert_eq!(config.target_column, "Attendance");
        assert_eq!(config.split_year, 2022);
        assert_eq!(config.forecast_years, 0);
    }

    #[test]
    fn test_season_and_duplicates_removed() {
        let config = ForecastConfig::builder()
            .feature_columns(["Season", "Points", "Capacity", "Points"])
            .build()
            .unwrap();
        assert_eq!(config.feature_columns, vec!["Points", "Capacity"]);
    }

    #[test]
    fn test_regressors_of_literal_config() {
        let config = ForecastConfig {
            feature_columns: vec!["Season".into(), "Points".into(), "Points".into()],
            ..Default::default()
        };
        assert_eq!(config.regressors(), vec!["Points"]);
    }

    #[test]
    fn test_only_season_is_rejected() {
        let result = ForecastConfig::builder().feature_columns(["Season"]).build();
        assert!(matches!(result, Err(LearningError::InvalidConfig(_))));
    }

    #[test]
    fn test_target_as_feature_is_rejected() {
        let result = ForecastConfig::builder()
            .feature_columns(["Attendance", "Points"])
            .build();
        assert!(matches!(result, Err(LearningError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_target_is_rejected() {
        let result = ForecastConfig::builder()
            .feature_columns(["Points"])
            .target_column(" ")
            .build();
        assert!(matches!(result, Err(LearningError::InvalidConfig(_))));
    }

    #[test]
    fn test_serde_roundtrip_keeps_fields() {
        let config = ForecastConfig::builder()
            .feature_columns(["Points"])
            .forecast_years(2)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: ForecastConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
