//! Generic table normalisation helpers.
//!
//! Every helper takes the table by value and hands it back, so a cleaning
//! step reads as a chain of owned transformations:
//!
//! ```rust
//! use polars::prelude::*;
//! use wsl_processing::normalizer::{create_unique_id, remove_string_parts};
//!
//! let df = df! { "Squad" => &["Club Crest Arsenal"], "season" => &["2020_2021"] }.unwrap();
//! let df = remove_string_parts(df, "Squad", "Club Crest ").unwrap();
//! let df = create_unique_id(df, &["Squad", "season"], "unique_ID").unwrap();
//! assert_eq!(df.width(), 3);
//! ```

mod columns;
mod strings;

pub use columns::{
    convert_column_names, convert_to_numeric, create_unique_id, drop_columns, ensure_columns,
};
pub use strings::{map_values, remove_string_parts, replace_in_column, split_column};
