pub mod columns;
pub mod error;
pub mod options;
pub mod report;

pub use columns::{
    CLEAN_ARTIFACT_SUFFIX, CLEANING_FLAG_COLUMN, DATETIME_CANDIDATES, DEFAULT_METRICS,
    DEFAULT_ZSCORE_THRESHOLD, GROUP_COLUMN, MODULE_COLUMNS, OUTLIER_COLUMNS, PRIMARY_METRIC,
    SOURCE_FILE_COLUMN, TIME_FEATURE_COLUMNS, TIMESTAMP_COLUMN,
};
pub use error::{ConfigError, Result};
pub use options::{
    AllMissingPolicy, ExportOptions, FillStrategy, OutlierOptions, PreprocessOptions,
    SummaryOptions,
};
pub use report::{ComparisonReport, GroupStats, HypothesisTests, RankEntry};
