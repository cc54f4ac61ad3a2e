//! WSL Table Cleaning Library
//!
//! Cleans and reshapes season-by-season Women's Super League tables scraped
//! from an external stats site, built on Polars.
//!
//! # Overview
//!
//! - **Normalisation**: generic column/value helpers ([`normalizer`])
//! - **League tables**: club-name cleanup, season keys, top-scorer split,
//!   attendance parsing ([`process_season_table`])
//! - **Nationality tables**: country tokens, season-scoped ranks and
//!   English / European / Non-European grouping ([`process_nationality_table`])
//! - **IO**: tolerant loading of per-season CSVs and saving of results ([`io`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wsl_processing::io::{SeasonFile, concat_tables, load_season_tables};
//! use wsl_processing::{ProjectConfig, process_season_table};
//!
//! let config = ProjectConfig::builder().seasons(2018, 2023).build()?;
//!
//! let mut cleaned = Vec::new();
//! for (season, raw) in load_season_tables(&config.input_dir, SeasonFile::League, &config.seasons())? {
//!     if let Some(df) = process_season_table(raw, season)? {
//!         cleaned.push(df);
//!     }
//! }
//! let all_seasons = concat_tables(cleaned)?;
//! ```
//!
//! # Error Handling
//!
//! Missing season files and empty tables are logged and passed through as
//! `None`/empty. Unparsable numbers become nulls. Only structural problems
//! (a required column is absent, a save without a file name) are returned as
//! [`ProcessingError`].

pub mod cleaner;
pub mod config;
pub mod error;
pub mod io;
pub mod mappings;
pub mod normalizer;
pub mod season;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    NationalityGroup, NationalityRecord, SeasonRecord, process_nationality_table,
    process_season_table,
};
pub use config::{ConfigValidationError, ProjectConfig, ProjectConfigBuilder};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use season::Season;
pub use utils::{clean_numeric_string, parse_numeric_string};
