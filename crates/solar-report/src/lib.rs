//! Output side of the solar comparison pipeline.
//!
//! - [`export_groups`]: one cleaned, outlier-filtered `<group>_clean.csv` per group
//! - [`load_exported`] / [`load_comparison_frame`]: read artifacts back for summarizing
//! - [`write_report`]: persist a [`solar_model::ComparisonReport`] as JSON
//!
//! Every file is written to a temp sibling first and renamed into place.

mod atomic;
mod error;
mod export;
mod json;
mod reload;

pub use atomic::write_atomic;
pub use error::{ReportError, Result};
pub use export::{
    CleanedGroup, EXPORT_DATETIME_FORMAT, ExportSummary, ExportedGroup, SkippedGroup, clean_group,
    export_groups, write_frame_csv,
};
pub use json::{render_report, write_report};
pub use reload::{
    ComparisonFrame, ComparisonSource, list_exported, load_comparison_frame, load_exported,
};
