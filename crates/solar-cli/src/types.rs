use std::path::PathBuf;

use solar_ingest::{LoadedFile, SkippedFile};
use solar_model::ConfigError;
use solar_report::{ComparisonSource, ExportSummary};
use solar_stats::SummaryOutcome;

#[derive(Debug)]
pub struct IngestResult {
    pub data_dir: PathBuf,
    pub rows: usize,
    pub columns: usize,
    /// Merged rows per group, sorted by group.
    pub groups: Vec<(String, usize)>,
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug)]
pub struct CleanResult {
    pub output_dir: PathBuf,
    pub input_rows: usize,
    pub export: ExportSummary,
    pub skipped_files: Vec<SkippedFile>,
}

#[derive(Debug)]
pub struct SummarizeResult {
    pub source: ComparisonSource,
    pub report_path: PathBuf,
    pub rows: usize,
    pub outcome: SummaryOutcome,
    pub skipped_files: Vec<SkippedFile>,
}

impl SummarizeResult {
    pub fn skipped_metrics(&self) -> &[(String, ConfigError)] {
        &self.outcome.skipped_metrics
    }
}
