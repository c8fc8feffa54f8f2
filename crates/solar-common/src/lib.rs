//! Shared utilities for the solar comparison crates.
//!
//! This crate provides common utilities used across the workspace,
//! including Polars DataFrame helpers and slice statistics.

pub mod frame;
pub mod numeric;

// Re-export commonly used functions at crate root for convenience
pub use frame::{
    any_to_f64, any_to_string, column_f64_values, format_numeric, is_numeric_dtype, parse_f64,
    row_key,
};
pub use numeric::{mean, median, population_std};
