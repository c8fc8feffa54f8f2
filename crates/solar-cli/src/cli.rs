//! CLI argument definitions for `solar-compare`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "solar-compare",
    version,
    about = "Cross-country solar measurement comparison",
    long_about = "Merge per-site solar measurement CSVs, export cleaned per-country files,\n\
                  and compare countries with descriptive statistics, ANOVA and\n\
                  Kruskal-Wallis tests."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Locate and merge the measurement files of a directory.
    Ingest(IngestArgs),

    /// Export one cleaned, outlier-filtered CSV per country.
    Clean(CleanArgs),

    /// Compare countries and write the JSON report.
    Summarize(SummarizeArgs),

    /// Clean, then summarize the exported files.
    Run(RunArgs),
}

#[derive(Args)]
pub struct IngestArgs {
    /// Directory containing the measurement CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,
}

#[derive(Args, Default)]
pub struct CleanFlags {
    /// Directory for `<group>_clean.csv` files (default: DATA_DIR).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Imputation strategy for missing numeric values: median, mean or zero.
    #[arg(long = "fill-strategy", value_name = "STRATEGY")]
    pub fill_strategy: Option<String>,

    /// What to do with numeric columns that have no values: keep or drop.
    #[arg(long = "all-missing", value_name = "POLICY")]
    pub all_missing: Option<String>,

    /// Z-score threshold for outlier rejection.
    #[arg(long = "zscore", value_name = "Z")]
    pub zscore: Option<f64>,
}

#[derive(Args, Default)]
pub struct SummaryFlags {
    /// Metric to describe and rank (repeatable).
    #[arg(long = "metric", value_name = "COLUMN")]
    pub metrics: Vec<String>,

    /// Metric used for the hypothesis tests.
    #[arg(long = "primary", value_name = "COLUMN")]
    pub primary: Option<String>,

    /// Output path of the JSON report.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Directory containing the measurement CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub flags: CleanFlags,
}

#[derive(Args)]
pub struct SummarizeArgs {
    /// Directory containing raw or exported CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Input preference: exported artifacts, raw files, or auto.
    #[arg(long = "source", value_enum)]
    pub source: Option<SourceArg>,

    #[command(flatten)]
    pub flags: SummaryFlags,
}

#[derive(Args)]
pub struct RunArgs {
    /// Directory containing the measurement CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub clean: CleanFlags,

    #[command(flatten)]
    pub summary: SummaryFlags,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Auto,
    Exported,
    Raw,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
