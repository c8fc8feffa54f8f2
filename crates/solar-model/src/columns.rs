//! Column names and fixed column sets shared across the pipeline.

/// Injected column holding the group identifier derived from the file name.
pub const GROUP_COLUMN: &str = "group";

/// Injected column holding the base name of the originating file.
pub const SOURCE_FILE_COLUMN: &str = "source_file";

/// Principal irradiance measurement (global horizontal irradiance).
pub const PRIMARY_METRIC: &str = "GHI";

/// Metrics summarized by default: global, direct normal and diffuse irradiance.
pub const DEFAULT_METRICS: [&str; 3] = ["GHI", "DNI", "DHI"];

/// Columns screened by the per-group z-score filter, in filtering order.
///
/// The filter narrows rows column by column, so this order is part of the
/// output contract.
pub const OUTLIER_COLUMNS: [&str; 7] = ["GHI", "DNI", "DHI", "ModA", "ModB", "WS", "WSgust"];

/// Default z-score threshold for outlier rejection.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Lowercase names recognised as timestamp columns, in exact-match priority order.
pub const DATETIME_CANDIDATES: [&str; 4] = ["time", "date", "datetime", "timestamp"];

/// Calendar fields derived from the timestamp column.
pub const TIME_FEATURE_COLUMNS: [&str; 5] = ["year", "month", "day", "hour", "dayofweek"];

/// Timestamp column expected in exported per-group artifacts.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// File-stem suffix of exported per-group artifacts (`<group>_clean.csv`).
pub const CLEAN_ARTIFACT_SUFFIX: &str = "_clean";

/// Flag column marking rows recorded right after a panel cleaning event.
pub const CLEANING_FLAG_COLUMN: &str = "Cleaning";

/// Module sensor channels compared before and after cleaning.
pub const MODULE_COLUMNS: [&str; 2] = ["ModA", "ModB"];
