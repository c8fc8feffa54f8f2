//! Cleaning and filtering stages of the solar comparison pipeline.
//!
//! Every stage takes a DataFrame by reference and returns a new one, so each
//! step can be checked on its own:
//!
//! - [`basic_clean`]: trim column names, drop duplicate rows
//! - [`find_datetime_column`] / [`parse_datetime`] / [`add_time_features`]
//! - [`simple_fill_numeric`]: median, mean or zero imputation
//! - [`quick_preprocess`]: the four steps above in fixed order
//! - [`zscore_filter`]: sequential per-column outlier rejection

mod clean;
mod datetime;
mod error;
mod fill;
mod outlier;
mod pipeline;

pub use clean::basic_clean;
pub use datetime::{add_time_features, find_datetime_column, parse_datetime, parse_timestamp};
pub use error::{Result, TransformError};
pub use fill::{FillOutcome, FillReport, FilledColumn, simple_fill_numeric};
pub use outlier::{OutlierOutcome, OutlierPass, zscore_filter};
pub use pipeline::{Preprocessed, quick_preprocess};
