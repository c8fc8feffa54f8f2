//! Per-group cleaned exports.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::{BooleanChunked, CsvWriter, DataFrame, NewChunkedArray, SerWriter};
use tracing::{info, info_span, warn};

use solar_common::{column_f64_values, is_numeric_dtype};
use solar_ingest::artifact_file_name;
use solar_model::{ExportOptions, GROUP_COLUMN};
use solar_stats::group_labels;
use solar_transform::{quick_preprocess, zscore_filter};

use crate::atomic::write_atomic;
use crate::error::{ReportError, Result};

/// Timestamp layout used in exported CSV files.
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedGroup {
    pub group: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub outlier_rows_removed: usize,
}

/// A group that was not exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGroup {
    pub group: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: Vec<ExportedGroup>,
    pub skipped: Vec<SkippedGroup>,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.exported.iter().map(|group| group.rows).sum()
    }
}

/// Cleans, filters and writes one `<group>_clean.csv` per group.
///
/// Groups are processed in lexicographic order. Each group's rows go through
/// `quick_preprocess`, then the z-score filter, then lose rows missing the
/// target metric. Rows with a null group are ignored. A group that fails to
/// clean or write is recorded in `skipped` and the remaining groups continue;
/// only invalid options abort the batch.
pub fn export_groups(
    merged: &DataFrame,
    out_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    options.validate()?;
    let mut summary = ExportSummary::default();
    if merged.height() == 0 {
        return Ok(summary);
    }

    let labels = group_labels(merged, GROUP_COLUMN)?;
    let groups: BTreeSet<&str> = labels.iter().flatten().map(String::as_str).collect();

    for group in groups {
        if group.trim().is_empty() {
            warn!("rows with an empty group identifier not exported");
            summary.skipped.push(SkippedGroup {
                group: group.to_string(),
                reason: "empty group identifier".to_string(),
            });
            continue;
        }
        let span = info_span!("export_group", group = %group);
        let _guard = span.enter();
        match export_group(merged, &labels, group, out_dir, options) {
            Ok(exported) => summary.exported.push(exported),
            Err(error) => {
                warn!(error = %error, "group not exported");
                summary.skipped.push(SkippedGroup {
                    group: group.to_string(),
                    reason: error.to_string(),
                });
            }
        }
    }
    Ok(summary)
}

fn export_group(
    merged: &DataFrame,
    labels: &[Option<String>],
    group: &str,
    out_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportedGroup> {
    let start = Instant::now();
    let keep: Vec<bool> = labels
        .iter()
        .map(|label| label.as_deref() == Some(group))
        .collect();
    let subset = merged.filter(&BooleanChunked::from_slice("group".into(), &keep))?;
    let cleaned = clean_group(&subset, options)?;
    let mut data = cleaned.data;

    let path = out_dir.join(artifact_file_name(group));
    write_frame_csv(&mut data, &path)?;
    info!(
        path = %path.display(),
        rows_in = subset.height(),
        rows = data.height(),
        columns = data.width(),
        outliers = cleaned.outlier_rows_removed,
        duration_ms = start.elapsed().as_millis(),
        "group exported"
    );
    Ok(ExportedGroup {
        group: group.to_string(),
        path,
        rows: data.height(),
        columns: data.width(),
        outlier_rows_removed: cleaned.outlier_rows_removed,
    })
}

/// Rows of one group after cleaning and filtering.
#[derive(Debug, Clone)]
pub struct CleanedGroup {
    pub data: DataFrame,
    pub outlier_rows_removed: usize,
}

/// Applies the export cleaning chain to one group's rows without writing.
pub fn clean_group(rows: &DataFrame, options: &ExportOptions) -> Result<CleanedGroup> {
    let preprocessed = quick_preprocess(rows, &options.preprocess)?;
    let filtered = zscore_filter(&preprocessed.data, &options.outlier)?;
    let outlier_rows_removed = filtered.rows_removed();
    let data = match options.target_metric.as_deref() {
        Some(target) => drop_missing(&filtered.data, target)?,
        None => filtered.data,
    };
    Ok(CleanedGroup {
        data,
        outlier_rows_removed,
    })
}

fn drop_missing(data: &DataFrame, column: &str) -> Result<DataFrame> {
    let Ok(values) = data.column(column) else {
        return Ok(data.clone());
    };
    let keep = if is_numeric_dtype(values.dtype()) {
        let present: Vec<bool> = column_f64_values(values)?
            .iter()
            .map(Option::is_some)
            .collect();
        BooleanChunked::from_slice("present".into(), &present)
    } else {
        values.is_not_null()
    };
    Ok(data.filter(&keep)?)
}

/// Writes a frame as CSV with a header row, replacing `path` atomically.
pub fn write_frame_csv(data: &mut DataFrame, path: &Path) -> Result<()> {
    write_atomic(path, |file| {
        CsvWriter::new(file)
            .include_header(true)
            .with_datetime_format(Some(EXPORT_DATETIME_FORMAT.into()))
            .finish(data)
            .map_err(ReportError::from)
    })
}
