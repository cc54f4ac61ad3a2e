//! Fixed lookup tables for WSL data.
//!
//! Everything here is immutable and lives for the whole process.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Raw league-table column → canonical column.
pub const SEASON_COL_MAP: &[(&str, &str)] = &[
    ("Rk", "Rank"),
    ("Squad", "Club"),
    ("MP", "Matches"),
    ("W", "Wins"),
    ("D", "Draws"),
    ("L", "Losses"),
    ("GF", "Goals_For"),
    ("GA", "Goals_Against"),
    ("GD", "Goal_Difference"),
    ("Pts", "Points"),
    ("xG", "Expected_Goals"),
    ("xGA", "Expected_Goals_Allowed"),
    ("xGD", "Expected_Goals_Difference"),
    ("xGD/90", "Expected_Goals_Difference_Per_90_Mins"),
    ("Pts/MP", "Points_Per_Match"),
    ("Attendance", "Attendance"),
    ("Top Team Scorer", "Top_Scorer"),
    ("Goalkeeper", "Goalkeeper"),
];

/// Raw nationality-table column → canonical column.
pub const NATIONALITY_COL_MAP: &[(&str, &str)] = &[
    ("Rk", "Rank"),
    ("Nation", "Nationality"),
    ("# Players", "Num_Players"),
    ("Min", "Minutes_Played"),
    ("List", "List_of_Players"),
];

/// Long club names → the short names used across seasons.
pub const CLUB_NAME_MAP: &[(&str, &str)] = &[
    ("Tottenham_Hotspur", "Tottenham"),
    ("West_Ham_United", "West_Ham"),
    ("Manchester_United", "Manchester_United"),
    ("Brighton_&_Hove_Albion", "Brighton"),
];

/// Countries counted as European for nationality grouping.
pub const EURO_COUNTRIES: &[&str] = &[
    "England",
    "Wales",
    "Scotland",
    "Republic_of_Ireland",
    "Netherlands",
    "Germany",
    "Sweden",
    "Northern_Ireland",
    "Belgium",
    "Norway",
    "Denmark",
    "Switzerland",
    "Austria",
    "Finland",
    "France",
    "Iceland",
    "Portugal",
    "Poland",
    "Spain",
    "Czech_Republic",
    "Greece",
    "Italy",
    "Russia",
    "Slovenia",
    "Serbia",
    "Hungary",
];

static EURO_COUNTRY_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| EURO_COUNTRIES.iter().copied().collect());

/// Membership test against [`EURO_COUNTRIES`].
pub fn is_euro_country(country: &str) -> bool {
    EURO_COUNTRY_SET.contains(country)
}

/// League-table columns dropped before publishing cleaned tables.
pub const WSL_DROP_COLUMNS: &[&str] = &[
    "Notes",
    "Goalkeeper",
    "Expected_Goals",
    "Expected_Goals_Allowed",
    "Expected_Goals_Difference",
    "Expected_Goals_Difference_Per_90_Mins",
    "Top_Scorer",
];

/// Nationality-table columns dropped before publishing cleaned tables.
pub const NATIONALITY_DROP_COLUMNS: &[&str] = &["List_of_Players", "euro_flag"];

/// Club brand colours, keyed by canonical club name.
pub const WSL_CLUB_COLOURS: &[(&str, &str)] = &[
    ("Arsenal", "#db0007"),
    ("Aston_Villa", "#670e36"),
    ("Birmingham_City", "#095cd2"),
    ("Brighton", "#095cd2"),
    ("Bristol_City", "#E21A23"),
    ("Chelsea", "#034694"),
    ("Crystal_Palace", "#1B458F"),
    ("Everton", "#274488"),
    ("Leicester_City", "#0053a0"),
    ("Liverpool", "#d00027"),
    ("Manchester_City", "#97c1e7"),
    ("Manchester_United", "#DA291C"),
    ("Reading", "#004494"),
    ("Sunderland", "#eb172b"),
    ("Tottenham", "#132257"),
    ("West_Ham", "#7c2c3b"),
    ("Yeovil_Town", "#348a6e"),
];

/// Colour for the season-average series.
pub const SEASON_AVG_COLOUR: &str = "#3d195b";

/// Colour for clubs without a brand colour.
pub const FALLBACK_COLOUR: &str = "#7f7f7f";

static CLUB_COLOUR_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| WSL_CLUB_COLOURS.iter().copied().collect());

/// Brand colour for a club, or [`FALLBACK_COLOUR`].
pub fn club_colour(club: &str) -> &'static str {
    CLUB_COLOUR_LOOKUP
        .get(club)
        .copied()
        .unwrap_or(FALLBACK_COLOUR)
}

/// Owned `{old: new}` map built from one of the slice tables above.
pub fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
