//! Project configuration: where raw tables live and where outputs go.
//!
//! Built with the builder pattern:
//!
//! ```rust
//! use wsl_processing::ProjectConfig;
//!
//! let config = ProjectConfig::builder()
//!     .input_dir("data/raw")
//!     .seasons(2018, 2023)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.seasons().len(), 6);
//! ```

use crate::season::Season;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory for raw scraped tables.
pub const DEFAULT_INPUT_DIR: &str = "data/raw";
/// Default directory for cleaned tables and forecasts.
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";

/// Configuration for a cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory holding the raw per-season CSV files.
    /// Default: "data/raw"
    pub input_dir: PathBuf,

    /// Directory for cleaned tables, forecasts and reports.
    /// Default: "data/processed"
    pub output_dir: PathBuf,

    /// Start year of the first season to load.
    /// Default: 2011
    pub first_season: i32,

    /// Start year of the last season to load.
    /// Default: 2024
    pub last_season: i32,

    /// Whether to write outputs to disk.
    /// Default: false
    pub save_outputs: bool,

    /// File-name prefix for saved outputs. Required when `save_outputs` is set.
    /// Default: None
    pub output_name: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            first_season: 2011,
            last_season: 2024,
            save_outputs: false,
            output_name: None,
        }
    }
}

impl ProjectConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProjectConfigBuilder {
        ProjectConfigBuilder::default()
    }

    /// Seasons covered by this run, oldest first.
    pub fn seasons(&self) -> Vec<Season> {
        Season::range(self.first_season, self.last_season)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.last_season < self.first_season {
            return Err(ConfigValidationError::InvalidSeasonRange {
                first: self.first_season,
                last: self.last_season,
            });
        }

        if self.save_outputs && self.output_name.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigValidationError::MissingOutputName);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid season range: {first}..={last} (last season must not precede the first)")]
    InvalidSeasonRange { first: i32, last: i32 },

    #[error("Saving outputs requires an output name")]
    MissingOutputName,
}

/// Builder for [`ProjectConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProjectConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    first_season: Option<i32>,
    last_season: Option<i32>,
    save_outputs: Option<bool>,
    output_name: Option<String>,
}

impl ProjectConfigBuilder {
    /// Set the directory holding raw per-season CSVs.
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }

    /// Set the directory for outputs.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the inclusive range of season start years.
    pub fn seasons(mut self, first: i32, last: i32) -> Self {
        self.first_season = Some(first);
        self.last_season = Some(last);
        self
    }

    /// Enable or disable writing outputs to disk.
    pub fn save_outputs(mut self, save: bool) -> Self {
        self.save_outputs = Some(save);
        self
    }

    /// Set the file-name prefix for saved outputs.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProjectConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProjectConfig, ConfigValidationError> {
        let defaults = ProjectConfig::default();
        let config = ProjectConfig {
            input_dir: self.input_dir.unwrap_or(defaults.input_dir),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            first_season: self.first_season.unwrap_or(defaults.first_season),
            last_season: self.last_season.unwrap_or(defaults.last_season),
            save_outputs: self.save_outputs.unwrap_or(defaults.save_outputs),
            output_name: self.output_name,
        };

        config.validate()?;
        Ok(config)
    }
}
