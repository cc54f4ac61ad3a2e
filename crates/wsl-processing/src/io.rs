//! Reading raw season files and writing cleaned tables.
//!
//! Season availability varies, so a missing file is reported and handed on
//! as `None` rather than failing the run.

use crate::error::{ProcessingError, Result, ResultExt};
use crate::season::Season;
use crate::utils::{f64_values, require_column, text_values};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Kind of raw per-season table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonFile {
    /// League standings (`wsl_{start}_{end}.csv`).
    League,
    /// Squad nationality breakdown (`wsl_nationality_{start}_{end}.csv`).
    Nationality,
}

impl SeasonFile {
    /// File name for one season.
    pub fn file_name(&self, season: Season) -> String {
        match self {
            Self::League => format!("wsl_{}.csv", season.label()),
            Self::Nationality => format!("wsl_nationality_{}.csv", season.label()),
        }
    }
}

/// Full path of a season's raw table under `dir`.
pub fn season_file_path(dir: &Path, kind: SeasonFile, season: Season) -> PathBuf {
    dir.join(kind.file_name(season))
}

/// Load a CSV file with a header row.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be parsed.
pub fn load_csv_data(path: impl AsRef<Path>) -> Result<Option<DataFrame>> {
    let path = path.as_ref();

    if !path.exists() {
        warn!("CSV file not found: {}", path.display());
        return Ok(None);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Reading {}", path.display()))?;

    debug!("Loaded {} with shape {:?}", path.display(), df.shape());
    Ok(Some(df))
}

/// Load one raw table per season, keeping seasons whose file is missing as `None`.
pub fn load_season_tables(
    dir: &Path,
    kind: SeasonFile,
    seasons: &[Season],
) -> Result<Vec<(Season, Option<DataFrame>)>> {
    seasons
        .iter()
        .map(|&season| Ok((season, load_csv_data(season_file_path(dir, kind, season))?)))
        .collect()
}

/// Load a `Club`,`Capacity` lookup table.
///
/// A missing file yields an empty map; rows with an unparsable capacity are skipped.
pub fn load_capacities(path: impl AsRef<Path>) -> Result<HashMap<String, f64>> {
    let Some(df) = load_csv_data(path)? else {
        return Ok(HashMap::new());
    };

    let clubs = text_values(require_column(&df, "Club")?)?;
    let capacities = f64_values(require_column(&df, "Capacity")?)?;

    Ok(clubs
        .into_iter()
        .zip(capacities)
        .filter_map(|(club, capacity)| Some((club?, capacity?)))
        .collect())
}

/// Write `df` as CSV to `dir/file_name`, creating `dir` if needed.
///
/// A `.csv` extension is added when `file_name` has none.
///
/// # Errors
///
/// Returns `MissingFileName` immediately when no file name is given.
pub fn save_csv(df: &mut DataFrame, dir: &Path, file_name: Option<&str>) -> Result<PathBuf> {
    let file_name = file_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(ProcessingError::MissingFileName)?;

    fs::create_dir_all(dir)?;

    let mut path = dir.join(file_name);
    if path.extension().is_none() {
        path.set_extension("csv");
    }

    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context(format!("Writing {}", path.display()))?;

    info!("Saved {} rows to {}", df.height(), path.display());
    Ok(path)
}

/// Stack per-season tables into one.
///
/// Columns missing from some seasons are filled with nulls; differing
/// numeric types are widened to a common supertype.
pub fn concat_tables(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let frames: Vec<LazyFrame> = frames
        .into_iter()
        .filter(|df| df.height() > 0)
        .map(|df| df.lazy())
        .collect();

    if frames.is_empty() {
        return Ok(DataFrame::empty());
    }

    let args = UnionArgs {
        to_supertypes: true,
        ..Default::default()
    };
    Ok(concat_lf_diagonal(frames, args)?.collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::column_names;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("wsl_processing_io_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_names() {
        let season = Season::new(2021, 2022);
        assert_eq!(SeasonFile::League.file_name(season), "wsl_2021_2022.csv");
        assert_eq!(
            SeasonFile::Nationality.file_name(season),
            "wsl_nationality_2021_2022.csv"
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let result = load_csv_data("/definitely/not/here.csv").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_without_name_fails() {
        let mut df = df! { "Club" => &["Arsenal"] }.unwrap();
        let err = save_csv(&mut df, &scratch_dir("noname"), None).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingFileName));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = scratch_dir("roundtrip");
        let mut df = df! { "Club" => &["Arsenal", "Chelsea"], "Capacity" => &[60704.0, 4850.0] }
            .unwrap();
        let path = save_csv(&mut df, &dir, Some("capacity")).unwrap();
        assert_eq!(path.file_name().unwrap(), "capacity.csv");

        let capacities = load_capacities(&path).unwrap();
        assert_eq!(capacities.get("Chelsea"), Some(&4850.0));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_concat_fills_missing_columns() {
        let old = df! { "Club" => &["Arsenal"], "Attendance" => &[Some(1500.0)] }.unwrap();
        let new = df! {
            "Club" => &["Chelsea"],
            "Attendance" => &[Some(4000.0)],
            "Expected_Goals" => &[41.2],
        }
        .unwrap();

        let combined = concat_tables(vec![old, new]).unwrap();
        assert_eq!(combined.height(), 2);
        assert_eq!(column_names(&combined), vec!["Club", "Attendance", "Expected_Goals"]);
        assert_eq!(require_column(&combined, "Expected_Goals").unwrap().null_count(), 1);
    }

    #[test]
    fn test_concat_nothing() {
        assert_eq!(concat_tables(Vec::new()).unwrap().height(), 0);
    }
}
