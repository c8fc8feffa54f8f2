//! Fixed-order preprocessing: clean, parse timestamps, derive features, fill.

use polars::prelude::DataFrame;
use tracing::debug;

use solar_model::PreprocessOptions;

use crate::clean::basic_clean;
use crate::datetime::{add_time_features, find_datetime_column, parse_datetime};
use crate::error::Result;
use crate::fill::{FillReport, simple_fill_numeric};

#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub data: DataFrame,
    /// Column treated as the timestamp, explicit or detected.
    pub datetime_column: Option<String>,
    /// Whether calendar features were added.
    pub time_features: bool,
    pub fill: FillReport,
}

/// Runs `basic_clean`, timestamp parsing, time features and numeric fill.
///
/// Duplicates are removed before derived columns exist, and derived columns
/// are filled like any other numeric column.
pub fn quick_preprocess(df: &DataFrame, options: &PreprocessOptions) -> Result<Preprocessed> {
    let cleaned = basic_clean(df)?;
    let datetime_column = options
        .datetime_column
        .clone()
        .or_else(|| find_datetime_column(&cleaned));

    let (with_features, time_features) = match &datetime_column {
        Some(column) => {
            let parsed = parse_datetime(&cleaned, column)?;
            add_time_features(&parsed, column)?
        }
        None => (cleaned, false),
    };

    let (data, fill) = simple_fill_numeric(
        &with_features,
        None,
        options.fill_strategy,
        options.all_missing,
    )?
    .into_parts();

    debug!(
        rows = data.height(),
        columns = data.width(),
        datetime_column = datetime_column.as_deref().unwrap_or(""),
        time_features,
        filled = fill.filled.len(),
        "preprocess complete"
    );
    Ok(Preprocessed {
        data,
        datetime_column,
        time_features,
        fill,
    })
}
