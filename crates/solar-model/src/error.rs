use thiserror::Error;

/// Invalid configuration detected before any data is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown fill strategy '{0}' (expected median, mean or zero)")]
    UnknownFillStrategy(String),
    #[error("unknown all-missing policy '{0}' (expected keep or drop)")]
    UnknownMissingPolicy(String),
    #[error("z-score threshold must be finite and positive, got {0}")]
    InvalidThreshold(f64),
    #[error("metric column '{metric}' not found in the data")]
    MetricNotFound { metric: String },
    #[error("group column '{column}' not found in the data")]
    GroupColumnNotFound { column: String },
    #[error("no {what} configured")]
    EmptyColumnList { what: &'static str },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
