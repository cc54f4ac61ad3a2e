//! wsl-learning: attendance forecasting for Women's Super League clubs.
//!
//! Builds a model input frame from cleaned season tables, fits an ordinary
//! least squares regression on the seasons before a split year, evaluates it
//! on the seasons after, and optionally extrapolates each club's attendance
//! a few seasons ahead.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wsl_learning::{ForecastConfig, ModelInputBuilder, fit_linear_model};
//!
//! let model_df = ModelInputBuilder::new()
//!     .capacities(capacities)
//!     .reference_year(2022)
//!     .build(&cleaned_seasons)?;
//!
//! let config = ForecastConfig::builder()
//!     .feature_columns(["Points", "years_since_euro"])
//!     .split_year(2022)
//!     .forecast_years(3)
//!     .build()?;
//!
//! let result = fit_linear_model(&model_df, &config)?;
//! println!("{}", result.combined_metrics_df);
//! ```
//!
//! # Architecture
//!
//! ```text
//! cleaned seasons ──► ModelInputBuilder ──► model input
//!                                               │
//!                     ┌─────────────────────────┼──────────────────────┐
//!                     ▼                         ▼                      ▼
//!               train (< split)           test (>= split)       extrapolate_clubs
//!                     │                         │                      │
//!              AttendanceModel::fit ──► predict + RegressionMetrics    │
//!                     └──────────────► enforce_types ◄─────────────────┘
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LearningError>`](LearningError).
//! Cleaning and IO failures from `wsl_processing` are wrapped in
//! [`LearningError::Processing`].

pub mod config;
pub mod error;
pub mod extrapolate;
pub mod features;
pub mod forecast;
pub mod metrics;
pub mod model;
pub mod postprocess;
pub mod report;
pub mod types;

pub use config::{ForecastConfig, ForecastConfigBuilder, PREDICTION_COLUMN, SEASON_COLUMN};
pub use error::LearningError;
pub use extrapolate::extrapolate_clubs;
pub use features::{CLUB_DUMMY_PREFIX, ModelInputBuilder, club_dummy_columns};
pub use forecast::fit_linear_model;
pub use metrics::RegressionMetrics;
pub use model::AttendanceModel;
pub use postprocess::{INTEGER_COLUMNS, enforce_types};
pub use report::{ClubForecast, ForecastReport};
pub use types::{ForecastResult, ForecastSummary};
