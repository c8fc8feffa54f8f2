//! Measurement ingestion for the solar comparison pipeline.
//!
//! This crate discovers per-site CSV files, loads each one into a Polars
//! DataFrame tagged with its `group` and `source_file`, and merges the
//! results into a single dataset.
//!
//! # Features
//!
//! - **File Discovery**: Non-recursive, name-sorted listing of `.csv` files
//! - **Record Loading**: Header probing, full-file schema inference, provenance tags
//! - **Merging**: Diagonal concatenation with an explicit skip list per failed file
//! - **Caching**: Process-scoped cache keyed by directory and file signature
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use solar_ingest::{DatasetCache, IngestOptions, load_all};
//!
//! let merged = load_all(Path::new("data"))?;
//! for skip in &merged.skipped {
//!     eprintln!("{}: {}", skip.path.display(), skip.reason);
//! }
//!
//! let mut cache = DatasetCache::new();
//! let cached = cache.get_or_load(Path::new("data"), &IngestOptions::default())?;
//! ```

mod cache;
mod loader;
mod discovery;
mod error;
mod merge;
mod naming;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use loader::{RecordSet, load_single, load_tagged, read_csv_frame, read_header};

// === File Discovery ===
pub use discovery::list_csv_files;

// === Group Naming ===
pub use naming::{artifact_file_name, group_from_artifact_name, group_from_filename, is_clean_artifact};

// === Merging ===
pub use merge::{
    IngestOptions, LoadedFile, MergeResult, SkippedFile, concat_frames, group_row_counts,
    load_all, load_all_with_options, merge_files,
};

// === Caching ===
pub use cache::{DatasetCache, directory_signature};
