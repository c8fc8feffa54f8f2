//! Timestamp column discovery, parsing and calendar features.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::{DataFrame, DataType, NamedFrom, Series, TimeUnit};
use tracing::debug;

use solar_model::{DATETIME_CANDIDATES, TIME_FEATURE_COLUMNS};

use crate::error::Result;

/// Date-time layouts tried after RFC 3339, in order.
const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the time of day is midnight.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn milliseconds() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// Guesses the timestamp column by name.
///
/// An exact case-insensitive match on `time`, `date`, `datetime` or
/// `timestamp` wins (tried in that order); otherwise the first column whose
/// lowercase name contains one of them.
pub fn find_datetime_column(df: &DataFrame) -> Option<String> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for candidate in DATETIME_CANDIDATES {
        if let Some(name) = names.iter().find(|name| name.to_lowercase() == candidate) {
            return Some(name.clone());
        }
    }
    names.into_iter().find(|name| {
        let lower = name.to_lowercase();
        DATETIME_CANDIDATES
            .iter()
            .any(|candidate| lower.contains(candidate))
    })
}

/// Parses one timestamp string. Naive values are taken as-is; offsets are
/// converted to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Converts `column` to a millisecond timestamp column.
///
/// Unparseable strings become null; no row is removed. Datetime columns are
/// kept, Date columns widened, and columns of any other type left alone.
pub fn parse_datetime(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let mut data = df.clone();
    let Ok(source) = df.column(column) else {
        return Ok(data);
    };
    match source.dtype() {
        DataType::Datetime(_, _) => Ok(data),
        DataType::Date => {
            let widened = source.cast(&milliseconds())?;
            data.with_column(widened)?;
            Ok(data)
        }
        DataType::String => {
            let strings = source.str()?;
            let millis: Vec<Option<i64>> = strings
                .into_iter()
                .map(|value| {
                    value
                        .and_then(parse_timestamp)
                        .map(|parsed| parsed.and_utc().timestamp_millis())
                })
                .collect();
            let invalid = millis.iter().filter(|value| value.is_none()).count();
            let parsed = Series::new(column.into(), millis).cast(&milliseconds())?;
            data.with_column(parsed)?;
            debug!(column, invalid, "timestamp column parsed");
            Ok(data)
        }
        other => {
            debug!(column, dtype = %other, "timestamp column has non-text type, left as is");
            Ok(data)
        }
    }
}

/// Adds `year`, `month`, `day`, `hour` and `dayofweek` (Monday = 0) from a
/// timestamp column.
///
/// Returns the input unchanged and `false` when the column is missing, not
/// temporal, or holds no valid timestamp.
pub fn add_time_features(df: &DataFrame, column: &str) -> Result<(DataFrame, bool)> {
    let Ok(source) = df.column(column) else {
        return Ok((df.clone(), false));
    };
    if !matches!(source.dtype(), DataType::Datetime(_, _) | DataType::Date) {
        return Ok((df.clone(), false));
    }
    let millis = source.cast(&milliseconds())?.cast(&DataType::Int64)?;
    let timestamps: Vec<Option<NaiveDateTime>> = millis
        .i64()?
        .into_iter()
        .map(|value| {
            value
                .and_then(DateTime::from_timestamp_millis)
                .map(|parsed| parsed.naive_utc())
        })
        .collect();
    if timestamps.iter().all(Option::is_none) {
        debug!(column, "no valid timestamps, time features skipped");
        return Ok((df.clone(), false));
    }

    let mut data = df.clone();
    // Same order as TIME_FEATURE_COLUMNS.
    let extractors: [fn(&NaiveDateTime) -> i32; 5] = [
        |ts| ts.year(),
        |ts| ts.month() as i32,
        |ts| ts.day() as i32,
        |ts| ts.hour() as i32,
        |ts| ts.weekday().num_days_from_monday() as i32,
    ];
    for (name, extract) in TIME_FEATURE_COLUMNS.into_iter().zip(extractors) {
        let values: Vec<Option<i32>> = timestamps
            .iter()
            .map(|ts| ts.as_ref().map(extract))
            .collect();
        data.with_column(Series::new(name.into(), values))?;
    }
    Ok((data, true))
}
