//! League-table cleaning for one season.

use crate::error::{Result, ResultExt};
use crate::mappings::{SEASON_COL_MAP, to_map};
use crate::normalizer::{
    convert_column_names, convert_to_numeric, create_unique_id, remove_string_parts,
    replace_in_column, split_column,
};
use crate::season::Season;
use crate::utils::{has_column, require_column, text_values};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Marker the scraper leaves in front of every club name.
pub const CLUB_CREST_MARKER: &str = "Club Crest ";

/// Clean one season's raw league table.
///
/// Absent or empty input is logged and handed back untouched. Otherwise the
/// result always carries `Club`, `season` and `unique_ID`, plus
/// `Top_Scorer_Name`/`Top_Scorer_Goals` (null when the scorer column is
/// missing) and a numeric `Attendance`.
///
/// # Errors
///
/// Returns `ColumnNotFound` if the raw table has no `Squad` column.
pub fn process_season_table(df: Option<DataFrame>, season: Season) -> Result<Option<DataFrame>> {
    let df = match df {
        Some(df) if df.height() > 0 => df,
        other => {
            info!("Skipped cleaning for {} (empty or missing)", season);
            return Ok(other);
        }
    };

    info!("Cleaning WSL for season {}...", season);
    clean(df, season)
        .context(format!("Cleaning league table for {season}"))
        .map(Some)
}

fn clean(df: DataFrame, season: Season) -> Result<DataFrame> {
    let mut df = remove_string_parts(df, "Squad", CLUB_CREST_MARKER)?;
    df = replace_in_column(df, "Squad", " ", "_")?;

    let label = season.label();
    df.with_column(Series::new(
        "season".into(),
        vec![label.as_str(); df.height()],
    ))?;
    df = create_unique_id(df, &["Squad", "season"], "unique_ID")?;

    df = convert_column_names(df, &to_map(SEASON_COL_MAP))?;

    df = split_top_scorer(df, season)?;

    if has_column(&df, "Attendance") {
        df = convert_to_numeric(df, &["Attendance"])?;
    } else {
        warn!("No 'Attendance' column found for {}", season);
        df.with_column(Series::full_null(
            "Attendance".into(),
            df.height(),
            &DataType::Float64,
        ))?;
    }

    info!("Finished cleaning {} data.", season);
    Ok(df)
}

/// Derive `Top_Scorer_Name` and `Top_Scorer_Goals` from `Top_Scorer`.
fn split_top_scorer(df: DataFrame, season: Season) -> Result<DataFrame> {
    if !has_column(&df, "Top_Scorer") {
        warn!("No 'Top_Scorer' column found for {}", season);
        let mut df = df;
        let height = df.height();
        df.with_column(Series::full_null(
            "Top_Scorer_Name".into(),
            height,
            &DataType::String,
        ))?;
        df.with_column(Series::full_null(
            "Top_Scorer_Goals".into(),
            height,
            &DataType::Float64,
        ))?;
        return Ok(df);
    }

    let df = split_column(
        df,
        "Top_Scorer",
        " - ",
        &["Top_Scorer_Name", "Top_Scorer_Goals"],
    )?;
    let mut df = convert_to_numeric(df, &["Top_Scorer_Goals"])?;

    let names: Vec<Option<String>> = text_values(require_column(&df, "Top_Scorer_Name")?)?
        .into_iter()
        .map(|v| v.map(|s| normalise_scorer_names(&s)))
        .collect();
    df.with_column(Series::new("Top_Scorer_Name".into(), names))?;

    debug!("Split top scorer column for {}", season);
    Ok(df)
}

/// `"Beth Mead, Vivianne Miedema"` → `"Beth_Mead, Vivianne_Miedema"`.
pub fn normalise_scorer_names(raw: &str) -> String {
    raw.split(',')
        .map(|name| name.trim().replace(' ', "_"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{column_names, f64_values};
    use pretty_assertions::assert_eq;

    fn raw_table() -> DataFrame {
        df! {
            "Rk" => &[1i64, 2],
            "Squad" => &["Club Crest Manchester City", "Club Crest Arsenal"],
            "MP" => &[22i64, 22],
            "Pts" => &[55i64, 50],
            "Attendance" => &["2,456", "N/A"],
            "Top Team Scorer" => &["Khadija Shaw - 21", "Beth Mead, Vivianne Miedema - 9"],
        }
        .unwrap()
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        text_values(require_column(df, column).unwrap()).unwrap()
    }

    #[test]
    fn test_clean_season_table() {
        let df = process_season_table(Some(raw_table()), Season::new(2023, 2024))
            .unwrap()
            .unwrap();

        assert_eq!(
            strings(&df, "Club"),
            vec![
                Some("Manchester_City".to_string()),
                Some("Arsenal".to_string())
            ]
        );
        assert_eq!(
            strings(&df, "unique_ID"),
            vec![
                Some("Manchester_City_2023_2024".to_string()),
                Some("Arsenal_2023_2024".to_string())
            ]
        );
        assert_eq!(
            strings(&df, "Top_Scorer_Name"),
            vec![
                Some("Khadija_Shaw".to_string()),
                Some("Beth_Mead, Vivianne_Miedema".to_string())
            ]
        );
        assert_eq!(
            f64_values(require_column(&df, "Top_Scorer_Goals").unwrap()).unwrap(),
            vec![Some(21.0), Some(9.0)]
        );
        assert_eq!(
            f64_values(require_column(&df, "Attendance").unwrap()).unwrap(),
            vec![Some(2456.0), None]
        );

        let names = column_names(&df);
        for expected in ["Rank", "Matches", "Points", "season", "Top_Scorer"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_missing_top_scorer_column() {
        let raw = raw_table().drop("Top Team Scorer").unwrap();
        let df = process_season_table(Some(raw), Season::new(2013, 2014))
            .unwrap()
            .unwrap();

        assert_eq!(require_column(&df, "Top_Scorer_Name").unwrap().null_count(), 2);
        assert_eq!(require_column(&df, "Top_Scorer_Goals").unwrap().null_count(), 2);
    }

    #[test]
    fn test_scorer_without_goal_count() {
        let raw = df! {
            "Squad" => &["Reading"],
            "Attendance" => &["1,001"],
            "Top Team Scorer" => &["Fara Williams"],
        }
        .unwrap();
        let df = process_season_table(Some(raw), Season::new(2019, 2020))
            .unwrap()
            .unwrap();

        assert_eq!(strings(&df, "Top_Scorer_Name"), vec![Some("Fara_Williams".to_string())]);
        assert_eq!(require_column(&df, "Top_Scorer_Goals").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_and_missing_input_pass_through() {
        let season = Season::new(2020, 2021);
        assert!(process_season_table(None, season).unwrap().is_none());

        let empty = raw_table().head(Some(0));
        let out = process_season_table(Some(empty), season).unwrap().unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(column_names(&out), column_names(&raw_table()));
    }

    #[test]
    fn test_missing_squad_column_fails() {
        let raw = df! { "Team" => &["Arsenal"] }.unwrap();
        let err = process_season_table(Some(raw), Season::new(2020, 2021)).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_normalise_scorer_names() {
        assert_eq!(normalise_scorer_names("Beth Mead"), "Beth_Mead");
        assert_eq!(
            normalise_scorer_names("A B,  C D ,E"),
            "A_B, C_D, E"
        );
    }
}
