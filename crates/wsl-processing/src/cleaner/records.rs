//! Typed row views over cleaned tables.
//!
//! The cleaners work column-wise on DataFrames; library consumers that want
//! one struct per row read them back through these records. Required key columns must be present and non-null; every
//! other field is optional.

use crate::cleaner::NationalityGroup;
use crate::error::{ProcessingError, Result};
use crate::utils::{f64_values, has_column, require_column, text_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One club's cleaned league-table row for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub club: String,
    pub season: String,
    pub unique_id: String,
    pub rank: Option<i64>,
    pub matches: Option<i64>,
    pub wins: Option<i64>,
    pub draws: Option<i64>,
    pub losses: Option<i64>,
    pub goals_for: Option<i64>,
    pub goals_against: Option<i64>,
    pub points: Option<i64>,
    pub attendance: Option<f64>,
    pub top_scorer_name: Option<String>,
    pub top_scorer_goals: Option<i64>,
}

impl SeasonRecord {
    /// Read every row of a cleaned season table.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        let club = required_text(df, "Club")?;
        let season = required_text(df, "season")?;
        let unique_id = required_text(df, "unique_ID")?;

        let rank = optional_int(df, "Rank")?;
        let matches = optional_int(df, "Matches")?;
        let wins = optional_int(df, "Wins")?;
        let draws = optional_int(df, "Draws")?;
        let losses = optional_int(df, "Losses")?;
        let goals_for = optional_int(df, "Goals_For")?;
        let goals_against = optional_int(df, "Goals_Against")?;
        let points = optional_int(df, "Points")?;
        let attendance = optional_float(df, "Attendance")?;
        let top_scorer_name = optional_text(df, "Top_Scorer_Name")?;
        let top_scorer_goals = optional_int(df, "Top_Scorer_Goals")?;

        Ok((0..df.height())
            .map(|i| SeasonRecord {
                club: club[i].clone(),
                season: season[i].clone(),
                unique_id: unique_id[i].clone(),
                rank: rank[i],
                matches: matches[i],
                wins: wins[i],
                draws: draws[i],
                losses: losses[i],
                goals_for: goals_for[i],
                goals_against: goals_against[i],
                points: points[i],
                attendance: attendance[i],
                top_scorer_name: top_scorer_name[i].clone(),
                top_scorer_goals: top_scorer_goals[i],
            })
            .collect())
    }
}

/// One country's cleaned squad-composition row for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalityRecord {
    pub nationality: Option<String>,
    pub season: String,
    pub season_rank: String,
    pub rank: Option<i64>,
    pub num_players: Option<i64>,
    pub minutes_played: Option<f64>,
    pub group: NationalityGroup,
}

impl NationalityRecord {
    /// Read every row of a cleaned nationality table.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        let season = required_text(df, "season")?;
        let season_rank = required_text(df, "Season_Rank")?;
        let groups = required_text(df, "group")?
            .into_iter()
            .map(|label| {
                NationalityGroup::from_label(&label).ok_or_else(|| {
                    ProcessingError::InvalidData(format!("unknown nationality group '{label}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let nationality = optional_text(df, "Nationality")?;
        let rank = optional_int(df, "Rank")?;
        let num_players = optional_int(df, "Num_Players")?;
        let minutes_played = optional_float(df, "Minutes_Played")?;

        Ok((0..df.height())
            .map(|i| NationalityRecord {
                nationality: nationality[i].clone(),
                season: season[i].clone(),
                season_rank: season_rank[i].clone(),
                rank: rank[i],
                num_players: num_players[i],
                minutes_played: minutes_played[i],
                group: groups[i],
            })
            .collect())
    }
}

fn required_text(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    text_values(require_column(df, column)?)?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| {
                ProcessingError::InvalidData(format!("column '{column}' contains null keys"))
            })
        })
        .collect()
}

fn optional_text(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    if !has_column(df, column) {
        return Ok(vec![None; df.height()]);
    }
    text_values(require_column(df, column)?)
}

fn optional_float(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    if !has_column(df, column) {
        return Ok(vec![None; df.height()]);
    }
    f64_values(require_column(df, column)?)
}

fn optional_int(df: &DataFrame, column: &str) -> Result<Vec<Option<i64>>> {
    Ok(optional_float(df, column)?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()).map(|x| x.round() as i64))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{process_nationality_table, process_season_table};
    use crate::season::Season;

    #[test]
    fn test_season_records() {
        let raw = df! {
            "Rk" => &[1i64],
            "Squad" => &["Club Crest Chelsea"],
            "W" => &[18i64],
            "Attendance" => &["4,000"],
            "Top Team Scorer" => &["Sam Kerr - 12"],
        }
        .unwrap();
        let cleaned = process_season_table(Some(raw), Season::new(2021, 2022))
            .unwrap()
            .unwrap();
        let records = SeasonRecord::from_frame(&cleaned).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.club, "Chelsea");
        assert_eq!(record.unique_id, "Chelsea_2021_2022");
        assert_eq!(record.wins, Some(18));
        assert_eq!(record.losses, None);
        assert_eq!(record.attendance, Some(4000.0));
        assert_eq!(record.top_scorer_name.as_deref(), Some("Sam_Kerr"));
        assert_eq!(record.top_scorer_goals, Some(12));
    }

    #[test]
    fn test_nationality_records() {
        let raw = df! {
            "Rk" => &[1i64, 2],
            "Nation" => &["eng England", "jp Japan"],
            "# Players" => &["100", "3"],
            "Min" => &["40,000", "2,100"],
        }
        .unwrap();
        let cleaned = process_nationality_table(Some(raw), Season::new(2021, 2022))
            .unwrap()
            .unwrap();
        let records = NationalityRecord::from_frame(&cleaned).unwrap();

        assert_eq!(records[0].group, NationalityGroup::English);
        assert_eq!(records[1].group, NationalityGroup::NonEuropean);
        assert_eq!(records[1].season_rank, "2021_2022_2");
        assert_eq!(records[1].num_players, Some(3));
    }

    #[test]
    fn test_null_key_is_a_data_error() {
        let df = df! {
            "Club" => &[Some("Arsenal"), None],
            "season" => &["2021_2022", "2021_2022"],
            "unique_ID" => &["Arsenal_2021_2022", "x"],
        }
        .unwrap();
        let err = SeasonRecord::from_frame(&df).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidData(_)));
        assert_eq!(err.error_code(), "INVALID_DATA");
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_unknown_group_is_a_data_error() {
        let df = df! {
            "season" => &["2021_2022"],
            "Season_Rank" => &["2021_2022_1"],
            "group" => &["Martian"],
        }
        .unwrap();
        let err = NationalityRecord::from_frame(&df).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidData(msg) if msg.contains("Martian")));
    }

    #[test]
    fn test_missing_key_column() {
        let df = df! { "Club" => &["Arsenal"] }.unwrap();
        assert!(SeasonRecord::from_frame(&df).is_err());
    }
}
