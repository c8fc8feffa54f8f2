//! Pipeline configuration file (TOML).
//!
//! Every section and field is optional; missing values fall back to the
//! library defaults. Command-line flags override values from the file.
//!
//! ```toml
//! [ingest]
//! exclude_artifacts = true
//!
//! [clean]
//! fill_strategy = "median"
//! all_missing = "keep"
//! zscore = 3.0
//! outlier_columns = ["GHI", "DNI", "DHI", "ModA", "ModB", "WS", "WSgust"]
//! target_metric = "GHI"
//!
//! [summary]
//! metrics = ["GHI", "DNI", "DHI"]
//! primary_metric = "GHI"
//! source = "auto"
//!
//! [output]
//! report = "metrics/country_summary.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use solar_ingest::IngestOptions;
use solar_model::{
    AllMissingPolicy, DEFAULT_METRICS, DEFAULT_ZSCORE_THRESHOLD, ExportOptions, FillStrategy,
    OUTLIER_COLUMNS, OutlierOptions, PRIMARY_METRIC, PreprocessOptions, SummaryOptions,
};
use solar_report::ComparisonSource;

/// Default location of the JSON comparison report.
pub const DEFAULT_REPORT_PATH: &str = "metrics/country_summary.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingest: IngestSettings,
    pub clean: CleanSettings,
    pub summary: SummarySettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Leave `<group>_clean.csv` files out of raw ingestion.
    pub exclude_artifacts: bool,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            exclude_artifacts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanSettings {
    pub fill_strategy: String,
    pub all_missing: String,
    pub zscore: f64,
    pub outlier_columns: Vec<String>,
    pub datetime_column: Option<String>,
    pub target_metric: Option<String>,
}

impl Default for CleanSettings {
    fn default() -> Self {
        Self {
            fill_strategy: FillStrategy::default().to_string(),
            all_missing: AllMissingPolicy::default().to_string(),
            zscore: DEFAULT_ZSCORE_THRESHOLD,
            outlier_columns: OUTLIER_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            datetime_column: None,
            target_metric: Some(PRIMARY_METRIC.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub metrics: Vec<String>,
    pub primary_metric: String,
    pub source: String,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            metrics: DEFAULT_METRICS.iter().map(|m| (*m).to_string()).collect(),
            primary_metric: PRIMARY_METRIC.to_string(),
            source: ComparisonSource::default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for `<group>_clean.csv` files; the data directory when unset.
    pub output_dir: Option<PathBuf>,
    pub report: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            report: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl PipelineConfig {
    /// Reads the file at `path`, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions::default().with_exclude_artifacts(self.ingest.exclude_artifacts)
    }

    /// Validates the cleaning settings into typed options.
    pub fn preprocess_options(&self) -> Result<PreprocessOptions> {
        let fill_strategy: FillStrategy = self.clean.fill_strategy.parse()?;
        let all_missing: AllMissingPolicy = self.clean.all_missing.parse()?;
        let mut options = PreprocessOptions::default()
            .with_fill_strategy(fill_strategy)
            .with_all_missing(all_missing);
        if let Some(column) = &self.clean.datetime_column {
            options = options.with_datetime_column(column.clone());
        }
        Ok(options)
    }

    pub fn export_options(&self) -> Result<ExportOptions> {
        let outlier = OutlierOptions::default()
            .with_columns(self.clean.outlier_columns.iter().cloned())
            .with_threshold(self.clean.zscore);
        let options = ExportOptions::default()
            .with_preprocess(self.preprocess_options()?)
            .with_outlier(outlier)
            .with_target_metric(self.clean.target_metric.clone());
        options.validate()?;
        Ok(options)
    }

    pub fn summary_options(&self) -> Result<SummaryOptions> {
        let options = SummaryOptions::default()
            .with_metrics(self.summary.metrics.iter().cloned())
            .with_primary_metric(self.summary.primary_metric.clone());
        options.validate()?;
        Ok(options)
    }

    pub fn comparison_source(&self) -> Result<ComparisonSource> {
        self.summary
            .source
            .parse()
            .map_err(|message: String| anyhow::anyhow!(message))
    }
}
