//! Nationality-breakdown cleaning for one season.

use crate::error::{Result, ResultExt};
use crate::mappings::{NATIONALITY_COL_MAP, is_euro_country, to_map};
use crate::normalizer::{convert_column_names, convert_to_numeric, create_unique_id};
use crate::season::Season;
use crate::utils::{has_column, require_column, text_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Squad-composition group of a nationality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NationalityGroup {
    English,
    European,
    NonEuropean,
}

impl NationalityGroup {
    /// Every group, in display order.
    pub const ALL: [NationalityGroup; 3] = [Self::English, Self::European, Self::NonEuropean];

    /// Classify a cleaned country token.
    ///
    /// England wins over the flag; otherwise the flag decides.
    pub fn classify(nationality: Option<&str>, euro_flag: bool) -> Self {
        if nationality == Some("England") {
            Self::English
        } else if euro_flag {
            Self::European
        } else {
            Self::NonEuropean
        }
    }

    /// Label stored in the `group` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::European => "European (excl. Eng)",
            Self::NonEuropean => "Non-European",
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == label)
    }
}

impl fmt::Display for NationalityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"eng England"` → `England`, `"irl Republic of Ireland"` → `Republic_of_Ireland`.
///
/// Values with nothing after the qualifier have no country.
pub fn clean_country_name(raw: &str) -> Option<String> {
    raw.split_once(' ')
        .map(|(_, country)| country.replace(' ', "_"))
}

/// Clean one season's raw nationality table.
///
/// Absent or empty input is logged and handed back untouched.
///
/// # Errors
///
/// Returns `ColumnNotFound` if `Nation` or `Rk` is missing.
pub fn process_nationality_table(
    df: Option<DataFrame>,
    season: Season,
) -> Result<Option<DataFrame>> {
    let df = match df {
        Some(df) if df.height() > 0 => df,
        other => {
            info!("Skipped cleaning for {} (empty or missing)", season);
            return Ok(other);
        }
    };

    info!("Cleaning nationality season data for {}...", season);
    clean(df, season)
        .context(format!("Cleaning nationality table for {season}"))
        .map(Some)
}

fn clean(mut df: DataFrame, season: Season) -> Result<DataFrame> {
    let countries: Vec<Option<String>> = text_values(require_column(&df, "Nation")?)?
        .into_iter()
        .map(|v| v.as_deref().and_then(clean_country_name))
        .collect();
    df.with_column(Series::new("Nation".into(), countries))?;

    df = convert_column_names(df, &to_map(NATIONALITY_COL_MAP))?;

    let label = season.label();
    df.with_column(Series::new(
        "season".into(),
        vec![label.as_str(); df.height()],
    ))?;
    df = create_unique_id(df, &["season", "Rank"], "Season_Rank")?;

    for column in ["Num_Players", "Minutes_Played"] {
        if has_column(&df, column) {
            df = convert_to_numeric(df, &[column])?;
        } else {
            warn!("No '{}' column found for {}", column, season);
        }
    }

    let nationalities = text_values(require_column(&df, "Nationality")?)?;
    let flags: Vec<i32> = nationalities
        .iter()
        .map(|n| i32::from(n.as_deref().is_some_and(is_euro_country)))
        .collect();
    let groups: Vec<&str> = nationalities
        .iter()
        .zip(&flags)
        .map(|(n, flag)| NationalityGroup::classify(n.as_deref(), *flag == 1).as_str())
        .collect();

    df.with_column(Series::new("euro_flag".into(), flags))?;
    df.with_column(Series::new("group".into(), groups))?;

    info!("Finished cleaning nationality data for {}.", season);
    Ok(df)
}
