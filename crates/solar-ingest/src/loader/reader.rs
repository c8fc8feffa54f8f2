//! CSV file reading with provenance tagging.

use std::collections::HashSet;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{CsvReadOptions, DataFrame, NamedFrom, SerReader, Series};
use tracing::{debug, warn};

use solar_model::{GROUP_COLUMN, SOURCE_FILE_COLUMN};

use crate::error::{IngestError, Result};
use crate::naming::group_from_filename;

/// One source file loaded into a frame, tagged with its group and file name.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub group: String,
    pub source_file: String,
    pub data: DataFrame,
}

impl RecordSet {
    pub fn rows(&self) -> usize {
        self.data.height()
    }
}

/// Reads the header row of a CSV file.
///
/// Fails on empty files and on a first row without any column name.
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))?;
    let Some(record) = reader.records().next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let record = record.map_err(|e| csv_error(path, &e))?;
    let headers: Vec<String> = record
        .iter()
        .map(|value| value.trim().trim_matches('\u{feff}').to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }
    Ok(headers)
}

/// Reads a CSV file into a Polars DataFrame without tagging it.
///
/// The whole file is scanned for schema inference so late-appearing
/// decimals do not break integer-looking columns.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let headers = read_header(path)?;
    debug!(path = %path.display(), columns = headers.len(), "header detected");

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Loads one measurement file and tags it with a group derived from its name.
///
/// Files whose name yields no group are tagged with the lowercase file stem.
pub fn load_single(path: &Path) -> Result<RecordSet> {
    let group = match group_from_filename(path) {
        Some(group) => group,
        None => {
            let fallback = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_lowercase();
            warn!(path = %path.display(), group = %fallback, "no group in file name, using stem");
            fallback
        }
    };
    load_tagged(path, &group)
}

/// Loads one file and tags every row with the given group and the file's base name.
///
/// Header names are trimmed so files differing only in header whitespace
/// line up when merged.
pub fn load_tagged(path: &Path, group: &str) -> Result<RecordSet> {
    let mut data = read_csv_frame(path)?;
    trim_header_names(&mut data)?;
    let source_file = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    let height = data.height();
    data.with_column(Series::new(
        GROUP_COLUMN.into(),
        vec![group.to_string(); height],
    ))?;
    data.with_column(Series::new(
        SOURCE_FILE_COLUMN.into(),
        vec![source_file.clone(); height],
    ))?;
    debug!(
        path = %path.display(),
        group = %group,
        rows = height,
        columns = data.width(),
        "file loaded"
    );
    Ok(RecordSet {
        group: group.to_string(),
        source_file,
        data,
    })
}

/// Trims column names unless that would make two of them equal; the cleaner
/// merges such collisions later.
fn trim_header_names(data: &mut DataFrame) -> Result<()> {
    let trimmed: Vec<String> = data
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    let unique: HashSet<&str> = trimmed.iter().map(String::as_str).collect();
    if unique.len() == trimmed.len() {
        data.set_column_names(trimmed)?;
    }
    Ok(())
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
