//! Reloading exported artifacts and choosing the summarizer's input.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use solar_ingest::{
    DatasetCache, IngestError, IngestOptions, LoadedFile, MergeResult, SkippedFile,
    group_from_artifact_name, is_clean_artifact, list_csv_files, load_tagged, merge_files,
};
use solar_model::{PreprocessOptions, TIMESTAMP_COLUMN};
use solar_transform::{parse_datetime, quick_preprocess};

use crate::error::Result;

/// Where the summarizer takes its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonSource {
    /// Exported artifacts when any exist, raw files otherwise.
    #[default]
    Auto,
    /// Only `<group>_clean.csv` artifacts.
    Exported,
    /// Raw files, merged and preprocessed on the fly.
    Raw,
}

impl ComparisonSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Exported => "exported",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for ComparisonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonSource {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "exported" => Ok(Self::Exported),
            "raw" => Ok(Self::Raw),
            other => Err(format!(
                "unknown comparison source '{other}' (expected auto, exported or raw)"
            )),
        }
    }
}

/// Rows ready for summarizing plus the per-file account of how they were read.
#[derive(Debug, Clone)]
pub struct ComparisonFrame {
    pub data: DataFrame,
    /// `Exported` or `Raw`, never `Auto`.
    pub source: ComparisonSource,
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Paths of the exported artifacts in `dir`, sorted by name.
pub fn list_exported(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_csv_files(dir)?
        .into_iter()
        .filter(|path| is_clean_artifact(path))
        .collect())
}

/// Loads every `<group>_clean.csv` in `dir` and merges them.
///
/// The group is taken from the file name, replacing any stored `group`
/// column, and a `Timestamp` column is parsed back into a timestamp type.
pub fn load_exported(dir: &Path) -> Result<MergeResult> {
    let mut nameless = Vec::new();
    let mut artifacts = Vec::new();
    for path in list_exported(dir)? {
        if group_from_artifact_name(&path).is_some() {
            artifacts.push(path);
        } else {
            warn!(path = %path.display(), "artifact name carries no group, skipped");
            nameless.push(SkippedFile {
                path,
                group: None,
                reason: "artifact name carries no group".to_string(),
            });
        }
    }

    let mut merged = merge_files(&artifacts, |path| {
        let group = group_from_artifact_name(path).unwrap_or_default();
        let mut records = load_tagged(path, &group)?;
        if let Some(column) = timestamp_column(&records.data) {
            records.data = parse_datetime(&records.data, &column).map_err(|e| {
                IngestError::DataFrame {
                    message: e.to_string(),
                }
            })?;
        }
        Ok(records)
    })?;
    merged.skipped.extend(nameless);
    Ok(merged)
}

fn timestamp_column(data: &DataFrame) -> Option<String> {
    data.get_column_names()
        .iter()
        .find(|name| name.eq_ignore_ascii_case(TIMESTAMP_COLUMN))
        .map(|name| name.to_string())
}

/// Produces the summarizer's input from `dir`.
///
/// Raw loads go through `cache`, so repeated calls reuse the merged files
/// until the directory changes.
pub fn load_comparison_frame(
    dir: &Path,
    source: ComparisonSource,
    ingest: &IngestOptions,
    preprocess: &PreprocessOptions,
    cache: &mut DatasetCache,
) -> Result<ComparisonFrame> {
    let resolved = match source {
        ComparisonSource::Auto if !list_exported(dir)?.is_empty() => ComparisonSource::Exported,
        ComparisonSource::Auto => ComparisonSource::Raw,
        other => other,
    };
    info!(dir = %dir.display(), requested = %source, source = %resolved, "loading comparison input");

    match resolved {
        ComparisonSource::Exported => {
            let merged = load_exported(dir)?;
            Ok(ComparisonFrame {
                data: merged.data,
                source: resolved,
                loaded: merged.loaded,
                skipped: merged.skipped,
            })
        }
        _ => {
            let merged = cache.get_or_load(dir, ingest)?;
            let preprocessed = quick_preprocess(&merged.data, preprocess)?;
            Ok(ComparisonFrame {
                data: preprocessed.data,
                source: ComparisonSource::Raw,
                loaded: merged.loaded.clone(),
                skipped: merged.skipped.clone(),
            })
        }
    }
}
