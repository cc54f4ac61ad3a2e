//! Value-level text operations on a single column.

use crate::error::Result;
use crate::utils::{require_column, text_values};
use polars::prelude::*;
use std::collections::HashMap;

/// Remove every literal occurrence of `substring` from `column`.
///
/// Values are coerced to text first. An absent substring leaves values as
/// they were; nulls stay null.
pub fn remove_string_parts(df: DataFrame, column: &str, substring: &str) -> Result<DataFrame> {
    replace_in_column(df, column, substring, "")
}

/// Replace every literal occurrence of `from` with `to` in `column`.
pub fn replace_in_column(mut df: DataFrame, column: &str, from: &str, to: &str) -> Result<DataFrame> {
    let values = text_values(require_column(&df, column)?)?;

    let replaced: Vec<Option<String>> = values
        .into_iter()
        .map(|v| {
            v.map(|s| {
                if from.is_empty() {
                    s
                } else {
                    s.replace(from, to)
                }
            })
        })
        .collect();

    df.with_column(Series::new(column.into(), replaced))?;
    Ok(df)
}

/// Split `column` on `separator` into `new_columns`.
///
/// Each value yields at most `new_columns.len()` parts; the last part keeps
/// any remaining separators. Positions a row does not produce are null.
pub fn split_column(
    mut df: DataFrame,
    column: &str,
    separator: &str,
    new_columns: &[&str],
) -> Result<DataFrame> {
    let values = text_values(require_column(&df, column)?)?;
    let n = new_columns.len();
    let mut parts: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(values.len()); n];

    for value in &values {
        let pieces: Vec<&str> = match value.as_deref() {
            Some(s) if !separator.is_empty() => s.splitn(n, separator).collect(),
            Some(s) => vec![s],
            None => Vec::new(),
        };

        for (i, column_parts) in parts.iter_mut().enumerate() {
            column_parts.push(pieces.get(i).map(|p| p.to_string()));
        }
    }

    for (name, values) in new_columns.iter().zip(parts) {
        df.with_column(Series::new((*name).into(), values))?;
    }
    Ok(df)
}

/// Replace values of `column` found as keys in `mapping`.
///
/// Values without a mapping entry are left unchanged. The result column is text.
pub fn map_values(
    mut df: DataFrame,
    column: &str,
    mapping: &HashMap<String, String>,
) -> Result<DataFrame> {
    let values = text_values(require_column(&df, column)?)?;

    let mapped: Vec<Option<String>> = values
        .into_iter()
        .map(|v| v.map(|s| mapping.get(&s).cloned().unwrap_or(s)))
        .collect();

    df.with_column(Series::new(column.into(), mapped))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use pretty_assertions::assert_eq;

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        text_values(require_column(df, column).unwrap()).unwrap()
    }

    #[test]
    fn test_remove_string_parts() {
        let df = df! { "Squad" => &["Club Crest Arsenal", "Chelsea", "Club Crest Club Crest Everton"] }
            .unwrap();
        let df = remove_string_parts(df, "Squad", "Club Crest ").unwrap();
        assert_eq!(
            strings(&df, "Squad"),
            vec![
                Some("Arsenal".to_string()),
                Some("Chelsea".to_string()),
                Some("Everton".to_string())
            ]
        );
    }

    #[test]
    fn test_remove_string_parts_coerces_numbers() {
        let df = df! { "Rk" => &[10i64, 21] }.unwrap();
        let df = remove_string_parts(df, "Rk", "1").unwrap();
        assert_eq!(
            strings(&df, "Rk"),
            vec![Some("0".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_remove_string_parts_missing_column() {
        let df = df! { "Squad" => &["Arsenal"] }.unwrap();
        assert!(matches!(
            remove_string_parts(df, "Club", "x"),
            Err(ProcessingError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_split_column_with_and_without_separator() {
        let df = df! { "Top_Scorer" => &[Some("A - 5"), Some("Nobody"), None] }.unwrap();
        let df = split_column(df, "Top_Scorer", " - ", &["name", "goals"]).unwrap();

        assert_eq!(
            strings(&df, "name"),
            vec![Some("A".to_string()), Some("Nobody".to_string()), None]
        );
        assert_eq!(strings(&df, "goals"), vec![Some("5".to_string()), None, None]);
    }

    #[test]
    fn test_split_column_keeps_remainder_in_last_part() {
        let df = df! { "Top_Scorer" => &["A - B - 7"] }.unwrap();
        let df = split_column(df, "Top_Scorer", " - ", &["name", "goals"]).unwrap();
        assert_eq!(strings(&df, "name"), vec![Some("A".to_string())]);
        assert_eq!(strings(&df, "goals"), vec![Some("B - 7".to_string())]);
    }

    #[test]
    fn test_split_column_three_ways() {
        let df = df! { "code" => &["a_b_c", "a_b", "a"] }.unwrap();
        let df = split_column(df, "code", "_", &["x", "y", "z"]).unwrap();
        assert_eq!(
            strings(&df, "z"),
            vec![Some("c".to_string()), None, None]
        );
        assert_eq!(
            strings(&df, "y"),
            vec![Some("b".to_string()), Some("b".to_string()), None]
        );
    }

    #[test]
    fn test_map_values_leaves_unmapped() {
        let df = df! { "Club" => &["Tottenham_Hotspur", "Arsenal"] }.unwrap();
        let mapping = HashMap::from([("Tottenham_Hotspur".to_string(), "Tottenham".to_string())]);
        let df = map_values(df, "Club", &mapping).unwrap();
        assert_eq!(
            strings(&df, "Club"),
            vec![Some("Tottenham".to_string()), Some("Arsenal".to_string())]
        );
    }
}
