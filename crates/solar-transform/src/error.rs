//! Error types for cleaning and filtering.

use solar_model::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid option value, raised before any data is touched.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
