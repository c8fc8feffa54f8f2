//! Batch loading and diagonal merging of measurement files.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, info, warn};

use solar_model::GROUP_COLUMN;

use crate::loader::{RecordSet, load_single};
use crate::discovery::list_csv_files;
use crate::error::Result;
use crate::naming::{group_from_filename, is_clean_artifact};

/// Options controlling which located files take part in a raw merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IngestOptions {
    /// Leave `<group>_clean.csv` artifacts out of raw ingestion.
    pub exclude_artifacts: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            exclude_artifacts: true,
        }
    }
}

impl IngestOptions {
    pub fn with_exclude_artifacts(mut self, exclude: bool) -> Self {
        self.exclude_artifacts = exclude;
        self
    }
}

/// A file that was loaded into the merged dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub group: String,
    pub rows: usize,
}

/// A file that failed to load and contributed no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub group: Option<String>,
    pub reason: String,
}

/// Outcome of a batch load: the merged rows plus a per-file account.
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub data: DataFrame,
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl MergeResult {
    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Distinct groups of the loaded files, sorted.
    pub fn groups(&self) -> Vec<String> {
        self.loaded
            .iter()
            .map(|file| file.group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Loads and merges every CSV file in a directory with default options.
pub fn load_all(dir: &Path) -> Result<MergeResult> {
    load_all_with_options(dir, &IngestOptions::default())
}

/// Loads and merges every CSV file in a directory.
///
/// Only a missing or unreadable directory is an error. Files that fail to
/// load are reported in [`MergeResult::skipped`].
pub fn load_all_with_options(dir: &Path, options: &IngestOptions) -> Result<MergeResult> {
    let mut files = list_csv_files(dir)?;
    if options.exclude_artifacts {
        files.retain(|path| {
            let artifact = is_clean_artifact(path);
            if artifact {
                debug!(path = %path.display(), "skipping cleaned artifact");
            }
            !artifact
        });
    }
    info!(dir = %dir.display(), files = files.len(), "loading measurement files");
    merge_files(&files, load_single)
}

/// Loads each path with `load` and concatenates the successes in order.
pub fn merge_files<F>(paths: &[PathBuf], mut load: F) -> Result<MergeResult>
where
    F: FnMut(&Path) -> Result<RecordSet>,
{
    let mut frames = Vec::with_capacity(paths.len());
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        match load(path) {
            Ok(records) => {
                loaded.push(LoadedFile {
                    path: path.clone(),
                    group: records.group.clone(),
                    rows: records.rows(),
                });
                frames.push(records.data);
            }
            Err(err) => {
                let group = group_from_filename(path);
                warn!(
                    path = %path.display(),
                    group = group.as_deref().unwrap_or(""),
                    error = %err,
                    "skipping file"
                );
                skipped.push(SkippedFile {
                    path: path.clone(),
                    group,
                    reason: err.to_string(),
                });
            }
        }
    }

    let data = concat_frames(&frames)?;
    info!(
        loaded = loaded.len(),
        skipped = skipped.len(),
        rows = data.height(),
        "merge complete"
    );
    Ok(MergeResult {
        data,
        loaded,
        skipped,
    })
}

/// Concatenates frames row-wise over the union of their columns.
///
/// Columns keep first-appearance order and are null-filled where a frame
/// lacks them. Conflicting types unify to Float64 when all are numeric,
/// otherwise to String. No frames yields an empty frame.
pub fn concat_frames(frames: &[DataFrame]) -> Result<DataFrame> {
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, Vec<DataType>> = HashMap::new();
    for frame in frames {
        for column in frame.get_columns() {
            let name = column.name().to_string();
            let dtypes = seen.entry(name.clone()).or_insert_with(|| {
                order.push(name);
                Vec::new()
            });
            if !matches!(column.dtype(), DataType::Null) {
                dtypes.push(column.dtype().clone());
            }
        }
    }
    let targets: Vec<(String, DataType)> = order
        .into_iter()
        .map(|name| {
            let dtype = seen
                .get(&name)
                .map_or(DataType::String, |dtypes| unify_dtypes(dtypes));
            (name, dtype)
        })
        .collect();

    let mut combined: Option<DataFrame> = None;
    for frame in frames {
        let height = frame.height();
        let mut columns = Vec::with_capacity(targets.len());
        for (name, dtype) in &targets {
            let column = match frame.column(name) {
                Ok(column) if column.dtype() == dtype => column.clone(),
                Ok(column) => column.cast(dtype)?,
                Err(_) => Column::full_null(name.as_str().into(), height, dtype),
            };
            columns.push(column);
        }
        let aligned = DataFrame::new(columns)?;
        if let Some(existing) = combined.as_mut() {
            existing.vstack_mut(&aligned)?;
        } else {
            combined = Some(aligned);
        }
    }

    Ok(combined.unwrap_or_else(DataFrame::empty))
}

fn unify_dtypes(dtypes: &[DataType]) -> DataType {
    let Some(first) = dtypes.first() else {
        return DataType::String;
    };
    if dtypes.iter().all(|dtype| dtype == first) {
        return first.clone();
    }
    if dtypes.iter().all(DataType::is_primitive_numeric) {
        DataType::Float64
    } else {
        DataType::String
    }
}

/// Row count per group in the merged data, for logging and summaries.
pub fn group_row_counts(data: &DataFrame) -> Result<Vec<(String, usize)>> {
    let Ok(column) = data.column(GROUP_COLUMN) else {
        return Ok(Vec::new());
    };
    let values = column.cast(&DataType::String)?;
    let values = values.str()?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    Ok(counts.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_concat_no_frames_is_empty() {
        let data = concat_frames(&[]).unwrap();
        assert_eq!(data.height(), 0);
        assert_eq!(data.width(), 0);
    }

    #[test]
    fn test_concat_aligns_columns_diagonally() {
        let first = frame(vec![
            Series::new("GHI".into(), vec![1.0, 2.0]).into_column(),
            Series::new("group".into(), vec!["benin", "benin"]).into_column(),
        ]);
        let second = frame(vec![
            Series::new("group".into(), vec!["togo"]).into_column(),
            Series::new("WS".into(), vec![4.5]).into_column(),
        ]);
        let data = concat_frames(&[first, second]).unwrap();

        assert_eq!(data.height(), 3);
        let names: Vec<String> = data
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["GHI", "group", "WS"]);
        let ghi = data.column("GHI").unwrap().f64().unwrap().clone();
        assert_eq!(ghi.get(2), None);
        let ws = data.column("WS").unwrap().f64().unwrap().clone();
        assert_eq!(ws.get(0), None);
        assert_eq!(ws.get(2), Some(4.5));
    }

    #[test]
    fn test_concat_unifies_numeric_types() {
        let first = frame(vec![Series::new("GHI".into(), vec![1i64, 2]).into_column()]);
        let second = frame(vec![Series::new("GHI".into(), vec![2.5f64]).into_column()]);
        let data = concat_frames(&[first, second]).unwrap();
        assert_eq!(data.column("GHI").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_concat_mixed_types_fall_back_to_string() {
        let first = frame(vec![Series::new("Comments".into(), vec![1i64]).into_column()]);
        let second = frame(vec![Series::new("Comments".into(), vec!["dusty"]).into_column()]);
        let data = concat_frames(&[first, second]).unwrap();
        assert_eq!(data.column("Comments").unwrap().dtype(), &DataType::String);
        assert_eq!(data.height(), 2);
    }

    #[test]
    fn test_group_row_counts() {
        let data = frame(vec![
            Series::new("group".into(), vec!["togo", "benin", "togo"]).into_column(),
        ]);
        let counts = group_row_counts(&data).unwrap();
        assert_eq!(
            counts,
            vec![("benin".to_string(), 1), ("togo".to_string(), 2)]
        );
    }

    #[test]
    fn test_ingest_options_default_excludes_artifacts() {
        assert!(IngestOptions::default().exclude_artifacts);
        assert!(
            !IngestOptions::default()
                .with_exclude_artifacts(false)
                .exclude_artifacts
        );
    }
}
