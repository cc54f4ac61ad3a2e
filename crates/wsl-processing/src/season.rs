//! Season identifiers.

use crate::error::{ProcessingError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static SEASON_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4})\s*[_/-]\s*(\d{4})\s*$").expect("Invalid regex: season label")
});

/// A league season spanning two calendar years.
///
/// Rendered as `"{start}_{end}"` everywhere a season is stored in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Season {
    pub start_year: i32,
    pub end_year: i32,
}

impl Season {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// The season starting in `start_year` and ending the following year.
    pub fn starting(start_year: i32) -> Self {
        Self::new(start_year, start_year + 1)
    }

    /// Table label, e.g. `2021_2022`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.start_year, self.end_year)
    }

    /// Parse a label such as `2021_2022` (also accepts `2021-2022` and `2021/2022`).
    pub fn parse(label: &str) -> Result<Self> {
        let caps = SEASON_LABEL
            .captures(label)
            .ok_or_else(|| ProcessingError::InvalidSeason(label.to_string()))?;

        let year = |i: usize| -> Result<i32> {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .ok_or_else(|| ProcessingError::InvalidSeason(label.to_string()))
        };

        Ok(Self::new(year(1)?, year(2)?))
    }

    /// Consecutive seasons whose start years run from `first` to `last` inclusive.
    pub fn range(first: i32, last: i32) -> Vec<Self> {
        (first..=last).map(Self::starting).collect()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.start_year, self.end_year)
    }
}
