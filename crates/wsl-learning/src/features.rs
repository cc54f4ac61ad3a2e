//! Turning cleaned season tables into model input.
//!
//! A cleaned league table is keyed by `Club` and the `season` label. The model
//! wants a numeric `Season`, a stadium `Capacity`, an optional
//! `years_since_euro` trend term and one indicator column per club.

use crate::config::SEASON_COLUMN;
use crate::error::{LearningError, Result};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};
use wsl_processing::mappings::{CLUB_NAME_MAP, to_map};
use wsl_processing::normalizer::{ensure_columns, map_values};
use wsl_processing::utils::{column_names, require_column, text_values};
use wsl_processing::{ProcessingError, Season};

/// Prefix of the per-club indicator columns.
pub const CLUB_DUMMY_PREFIX: &str = "Club_";

/// Name of the indicator column for `club`.
pub fn club_dummy_column(club: &str) -> String {
    format!("{CLUB_DUMMY_PREFIX}{club}")
}

/// Indicator columns present in `df`, in column order.
pub fn club_dummy_columns(df: &DataFrame) -> Vec<String> {
    column_names(df)
        .into_iter()
        .filter(|name| name.starts_with(CLUB_DUMMY_PREFIX))
        .collect()
}

/// Builds the model input frame from concatenated cleaned season tables.
///
/// # Example
///
/// ```
/// use polars::prelude::*;
/// use std::collections::HashMap;
/// use wsl_learning::ModelInputBuilder;
///
/// let seasons = df! {
///     "Club" => &["Arsenal", "Tottenham_Hotspur"],
///     "season" => &["2021_2022", "2021_2022"],
///     "Attendance" => &[4016.0, 1304.0],
/// }
/// .unwrap();
///
/// let model_df = ModelInputBuilder::new()
///     .capacities(HashMap::from([("Arsenal".to_string(), 60704.0)]))
///     .reference_year(2022)
///     .build(&seasons)
///     .unwrap();
///
/// assert!(model_df.column("Club_Tottenham").is_ok());
/// assert!(model_df.column("years_since_euro").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelInputBuilder {
    capacities: Option<HashMap<String, f64>>,
    reference_year: Option<i32>,
}

impl ModelInputBuilder {
    /// Create a builder that only adds `Season` and the club indicators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach stadium capacities keyed by canonical club name.
    #[must_use]
    pub fn capacities(mut self, capacities: HashMap<String, f64>) -> Self {
        self.capacities = Some(capacities);
        self
    }

    /// Add `years_since_euro = Season - year`.
    #[must_use]
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Build the model input frame.
    ///
    /// # Errors
    ///
    /// - [`LearningError::Processing`] when `Club` or `season` is missing, or a
    ///   season label cannot be parsed
    /// - [`LearningError::InvalidData`] when a row has no club name
    pub fn build(&self, seasons: &DataFrame) -> Result<DataFrame> {
        ensure_columns(seasons, &["Club", "season"])?;

        let mut df = map_values(seasons.clone(), "Club", &to_map(CLUB_NAME_MAP))?;

        let clubs: Vec<String> = text_values(require_column(&df, "Club")?)?
            .into_iter()
            .enumerate()
            .map(|(row, club)| {
                club.ok_or_else(|| LearningError::InvalidData(format!("row {row} has no Club")))
            })
            .collect::<Result<_>>()?;

        let years = season_years(&df)?;
        df.with_column(Series::new(SEASON_COLUMN.into(), years.clone()))?;

        if let Some(capacities) = &self.capacities {
            let capacity: Vec<Option<f64>> =
                clubs.iter().map(|club| capacities.get(club).copied()).collect();
            let unknown: BTreeSet<&str> = clubs
                .iter()
                .filter(|club| !capacities.contains_key(*club))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                warn!("No capacity known for: {:?}", unknown);
            }
            df.with_column(Series::new("Capacity".into(), capacity))?;
        }

        if let Some(reference) = self.reference_year {
            let since: Vec<i32> = years.iter().map(|year| year - reference).collect();
            df.with_column(Series::new("years_since_euro".into(), since))?;
        }

        let distinct: BTreeSet<&str> = clubs.iter().map(String::as_str).collect();
        for club in &distinct {
            let flags: Vec<i32> = clubs.iter().map(|c| i32::from(c == club)).collect();
            df.with_column(Series::new(club_dummy_column(club).into(), flags))?;
        }

        info!(
            "Built model input: {} rows, {} clubs",
            df.height(),
            distinct.len()
        );
        Ok(df)
    }
}

/// Season start year for every row of a table keyed by a `season` label.
fn season_years(df: &DataFrame) -> Result<Vec<i32>> {
    let years = text_values(require_column(df, "season")?)?
        .into_iter()
        .map(|label| {
            let label = label.ok_or_else(|| ProcessingError::InvalidSeason("null".to_string()))?;
            Ok(Season::parse(&label)?.start_year)
        })
        .collect::<Result<Vec<i32>>>()?;

    debug!("Parsed {} season labels", years.len());
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wsl_processing::utils::f64_values;

    fn seasons() -> DataFrame {
        df! {
            "Club" => &["Chelsea", "Tottenham_Hotspur", "Chelsea", "Arsenal"],
            "season" => &["2020_2021", "2020_2021", "2021_2022", "2021_2022"],
            "Attendance" => &[Some(1200.0), None, Some(2710.0), Some(4016.0)],
        }
        .unwrap()
    }

    #[test]
    fn test_season_and_dummies() {
        let df = ModelInputBuilder::new().build(&seasons()).unwrap();

        let season: Vec<Option<i32>> = require_column(&df, "Season")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(season, vec![Some(2020), Some(2020), Some(2021), Some(2021)]);

        assert_eq!(
            club_dummy_columns(&df),
            vec!["Club_Arsenal", "Club_Chelsea", "Club_Tottenham"]
        );
        let chelsea: Vec<Option<i32>> = require_column(&df, "Club_Chelsea")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(chelsea, vec![Some(1), Some(0), Some(1), Some(0)]);
        assert!(df.column("Capacity").is_err());
        assert!(df.column("years_since_euro").is_err());
    }

    #[test]
    fn test_capacity_and_reference_year() {
        let capacities = HashMap::from([
            ("Chelsea".to_string(), 4850.0),
            ("Arsenal".to_string(), 60704.0),
        ]);
        let df = ModelInputBuilder::new()
            .capacities(capacities)
            .reference_year(2022)
            .build(&seasons())
            .unwrap();

        let capacity = f64_values(require_column(&df, "Capacity").unwrap()).unwrap();
        assert_eq!(capacity, vec![Some(4850.0), None, Some(4850.0), Some(60704.0)]);

        let since = f64_values(require_column(&df, "years_since_euro").unwrap()).unwrap();
        assert_eq!(since, vec![Some(-2.0), Some(-2.0), Some(-1.0), Some(-1.0)]);
    }

    #[test]
    fn test_club_names_are_shortened() {
        let df = ModelInputBuilder::new().build(&seasons()).unwrap();
        let clubs = text_values(require_column(&df, "Club").unwrap()).unwrap();
        assert_eq!(clubs[1].as_deref(), Some("Tottenham"));
    }

    #[test]
    fn test_bad_season_label() {
        let df = df! { "Club" => &["Chelsea"], "season" => &["last year"] }.unwrap();
        let err = ModelInputBuilder::new().build(&df).unwrap_err();
        assert!(matches!(
            err,
            LearningError::Processing(ProcessingError::InvalidSeason(_))
        ));
    }

    #[test]
    fn test_missing_club_column() {
        let df = df! { "season" => &["2021_2022"] }.unwrap();
        assert!(ModelInputBuilder::new().build(&df).is_err());
    }
}
