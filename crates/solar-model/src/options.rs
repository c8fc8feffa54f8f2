//! Configuration options for cleaning, outlier filtering, export and summaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns::{
    DEFAULT_METRICS, DEFAULT_ZSCORE_THRESHOLD, GROUP_COLUMN, OUTLIER_COLUMNS, PRIMARY_METRIC,
};
use crate::error::{ConfigError, Result};

/// How missing numeric values are imputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Column median of the non-missing values.
    #[default]
    Median,
    /// Column arithmetic mean of the non-missing values.
    Mean,
    /// The constant zero.
    Zero,
}

impl FillStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Mean => "mean",
            Self::Zero => "zero",
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillStrategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            "zero" => Ok(Self::Zero),
            _ => Err(ConfigError::UnknownFillStrategy(value.to_string())),
        }
    }
}

/// What to do with a numeric column that has no observed value to impute from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllMissingPolicy {
    /// Leave the column untouched and report it.
    #[default]
    Keep,
    /// Remove the column from the dataset and report it.
    Drop,
}

impl AllMissingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Drop => "drop",
        }
    }
}

impl fmt::Display for AllMissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllMissingPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "drop" => Ok(Self::Drop),
            _ => Err(ConfigError::UnknownMissingPolicy(value.to_string())),
        }
    }
}

/// Options for the one-pass cleaning routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// Timestamp column to use instead of name-based discovery.
    pub datetime_column: Option<String>,
    /// Imputation strategy for numeric columns.
    pub fill_strategy: FillStrategy,
    /// Handling of numeric columns with no observed values.
    pub all_missing: AllMissingPolicy,
}

impl PreprocessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datetime_column(mut self, column: impl Into<String>) -> Self {
        self.datetime_column = Some(column.into());
        self
    }

    pub fn with_fill_strategy(mut self, strategy: FillStrategy) -> Self {
        self.fill_strategy = strategy;
        self
    }

    pub fn with_all_missing(mut self, policy: AllMissingPolicy) -> Self {
        self.all_missing = policy;
        self
    }
}

/// Options for sequential z-score outlier rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierOptions {
    /// Columns to screen, applied in this order.
    pub columns: Vec<String>,
    /// Maximum allowed distance from the mean, in standard deviations.
    pub threshold: f64,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        Self {
            columns: OUTLIER_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            threshold: DEFAULT_ZSCORE_THRESHOLD,
        }
    }
}

impl OutlierOptions {
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Rejects thresholds that would make the bound meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Options for the per-group exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub preprocess: PreprocessOptions,
    pub outlier: OutlierOptions,
    /// Rows missing this metric are dropped after filtering, when the column exists.
    pub target_metric: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            preprocess: PreprocessOptions::default(),
            outlier: OutlierOptions::default(),
            target_metric: Some(PRIMARY_METRIC.to_string()),
        }
    }
}

impl ExportOptions {
    pub fn with_preprocess(mut self, preprocess: PreprocessOptions) -> Self {
        self.preprocess = preprocess;
        self
    }

    pub fn with_outlier(mut self, outlier: OutlierOptions) -> Self {
        self.outlier = outlier;
        self
    }

    pub fn with_target_metric(mut self, metric: Option<String>) -> Self {
        self.target_metric = metric;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.outlier.validate()
    }
}

/// Options for the cross-group summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Metrics to describe and rank.
    pub metrics: Vec<String>,
    /// Metric used for the hypothesis tests.
    pub primary_metric: String,
    /// Column partitioning rows into groups.
    pub group_column: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            metrics: DEFAULT_METRICS.iter().map(|m| (*m).to_string()).collect(),
            primary_metric: PRIMARY_METRIC.to_string(),
            group_column: GROUP_COLUMN.to_string(),
        }
    }
}

impl SummaryOptions {
    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_primary_metric(mut self, metric: impl Into<String>) -> Self {
        self.primary_metric = metric.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(ConfigError::EmptyColumnList { what: "metrics" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_strategy_parses_case_insensitively() {
        assert_eq!("Median".parse::<FillStrategy>(), Ok(FillStrategy::Median));
        assert_eq!(" mean ".parse::<FillStrategy>(), Ok(FillStrategy::Mean));
        assert_eq!("ZERO".parse::<FillStrategy>(), Ok(FillStrategy::Zero));
    }

    #[test]
    fn unknown_fill_strategy_is_config_error() {
        let err = "mode".parse::<FillStrategy>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownFillStrategy("mode".to_string()));
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn all_missing_policy_parses() {
        assert_eq!("drop".parse::<AllMissingPolicy>(), Ok(AllMissingPolicy::Drop));
        assert!("ignore".parse::<AllMissingPolicy>().is_err());
    }

    #[test]
    fn outlier_defaults_follow_fixed_order() {
        let options = OutlierOptions::default();
        assert_eq!(
            options.columns,
            vec!["GHI", "DNI", "DHI", "ModA", "ModB", "WS", "WSgust"]
        );
        assert_eq!(options.threshold, 3.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn outlier_threshold_must_be_positive() {
        assert!(OutlierOptions::default().with_threshold(0.0).validate().is_err());
        assert!(
            OutlierOptions::default()
                .with_threshold(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn summary_requires_metrics() {
        let options = SummaryOptions::default().with_metrics(Vec::<String>::new());
        assert_eq!(
            options.validate(),
            Err(ConfigError::EmptyColumnList { what: "metrics" })
        );
    }
}
