//! JSON report of a forecasting run.
//!
//! Used for both `--json` output and the report file written with `--save`.

use crate::config::{PREDICTION_COLUMN, SEASON_COLUMN};
use crate::error::Result;
use crate::model::numeric_values;
use crate::types::{ForecastResult, ForecastSummary};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use wsl_processing::mappings::{SEASON_AVG_COLOUR, club_colour};
use wsl_processing::utils::{require_column, text_values};

/// Forecast for one club, with the colour used to plot it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubForecast {
    pub club: String,
    pub colour: String,
    /// `(season start year, predicted attendance)`; `None` when the club has
    /// too little history.
    pub seasons: Vec<(i32, Option<f64>)>,
}

/// Everything a report consumer needs about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub first_season: i32,
    pub last_season: i32,
    /// Rows in the concatenated cleaned league tables
    pub league_rows: usize,
    /// Rows in the concatenated cleaned nationality tables
    pub nationality_rows: usize,
    pub target_column: String,
    pub split_year: i32,
    pub model: ForecastSummary,
    pub forecasts: Vec<ClubForecast>,
    /// Colour for the league-wide average series
    pub season_average_colour: String,
}

impl ForecastReport {
    /// Collect the report for `result`.
    pub fn new(
        result: &ForecastResult,
        seasons: (i32, i32),
        league_rows: usize,
        nationality_rows: usize,
        target_column: &str,
        split_year: i32,
    ) -> Result<Self> {
        let forecasts = match &result.future_df {
            Some(future) => club_forecasts(future)?,
            None => Vec::new(),
        };

        Ok(Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            first_season: seasons.0,
            last_season: seasons.1,
            league_rows,
            nationality_rows,
            target_column: target_column.to_string(),
            split_year,
            model: result.summary(),
            forecasts,
            season_average_colour: SEASON_AVG_COLOUR.to_string(),
        })
    }

    /// Write the report as pretty JSON to `dir/{name}_report.json`.
    pub fn write(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}_report.json"));
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("Report written to {}", path.display());
        Ok(path)
    }
}

/// Group the rows of a future frame by club, keeping first-seen club order.
fn club_forecasts(future: &DataFrame) -> Result<Vec<ClubForecast>> {
    let clubs = text_values(require_column(future, "Club")?)?;
    let seasons = numeric_values(future, SEASON_COLUMN)?;
    let predictions = numeric_values(future, PREDICTION_COLUMN)?;

    let mut forecasts: Vec<ClubForecast> = Vec::new();
    for ((club, season), prediction) in clubs.into_iter().zip(seasons).zip(predictions) {
        let (Some(club), Some(season)) = (club, season) else {
            continue;
        };
        let entry = (season as i32, prediction);
        match forecasts.iter_mut().find(|f| f.club == club) {
            Some(existing) => existing.seasons.push(entry),
            None => forecasts.push(ClubForecast {
                colour: club_colour(&club).to_string(),
                club,
                seasons: vec![entry],
            }),
        }
    }
    Ok(forecasts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wsl_processing::mappings::FALLBACK_COLOUR;

    #[test]
    fn test_club_forecasts_grouped() {
        let future = df! {
            "Season" => &[2024i32, 2025, 2024, 2025],
            "Club" => &["Arsenal", "Arsenal", "Lewes", "Lewes"],
            "Predicted_Attendance" => &[Some(30000.0), Some(33000.0), None, None],
        }
        .unwrap();

        let forecasts = club_forecasts(&future).unwrap();
        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[0].club, "Arsenal");
        assert_eq!(forecasts[0].colour, "#db0007");
        assert_eq!(
            forecasts[0].seasons,
            vec![(2024, Some(30000.0)), (2025, Some(33000.0))]
        );
        assert_eq!(forecasts[1].colour, FALLBACK_COLOUR);
        assert_eq!(forecasts[1].seasons, vec![(2024, None), (2025, None)]);
    }
}
