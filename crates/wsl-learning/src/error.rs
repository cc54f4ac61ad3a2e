//! Error types for the wsl-learning crate.
//!
//! This module defines [`LearningError`], the error type returned by every
//! fallible operation in the crate.
//!
//! # Example
//!
//! ```
//! use wsl_learning::{ForecastConfig, LearningError};
//!
//! fn configure() -> Result<ForecastConfig, LearningError> {
//!     ForecastConfig::builder()
//!         .feature_columns(["Points", "Capacity"])
//!         .build()
//! }
//! # configure().unwrap();
//! ```

use thiserror::Error;
use wsl_processing::ProcessingError;

/// The main error type for wsl-learning operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid forecast configuration.
    ///
    /// Raised by [`ForecastConfigBuilder::build`](crate::ForecastConfigBuilder::build)
    /// and by [`ModelInputBuilder`](crate::ModelInputBuilder) setters that
    /// cannot be honoured.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A column the model needs is absent from the DataFrame.
    ///
    /// Column names are case-sensitive.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// The data cannot be used for modelling.
    ///
    /// Common causes:
    /// - a feature or target column is not numeric
    /// - the model and the frame disagree on the feature set
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The regression could not be fitted.
    ///
    /// Typically there are no complete training rows, or the design matrix is
    /// rank deficient (for example a feature that is constant within every
    /// club combined with the club dummies).
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// An error raised while cleaning or loading the input tables.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// An error raised by Polars while reshaping frames.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Failed to serialise a report.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LearningError>;
