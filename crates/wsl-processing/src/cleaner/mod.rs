//! Per-season cleaning of scraped WSL tables.
//!
//! This module provides:
//! - League-table cleaning ([`process_season_table`])
//! - Nationality-table cleaning ([`process_nationality_table`])
//! - Nationality grouping ([`NationalityGroup`])
//! - Typed row views over cleaned tables ([`SeasonRecord`], [`NationalityRecord`])
//!
//! Each call owns one season's table. Calls for different seasons are
//! independent of each other.

mod nationality;
mod records;
mod season;

pub use nationality::{NationalityGroup, clean_country_name, process_nationality_table};
pub use records::{NationalityRecord, SeasonRecord};
pub use season::{CLUB_CREST_MARKER, normalise_scorer_names, process_season_table};
