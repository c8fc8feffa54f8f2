//! Cross-country solar measurement comparison CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use solar_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use solar_cli::commands::{run_clean, run_ingest, run_pipeline, run_summarize};
use solar_cli::config::PipelineConfig;
use solar_cli::logging::{LogConfig, LogFormat, init_logging};
use solar_ingest::DatasetCache;

mod summary;

use crate::summary::{print_clean, print_ingest, print_summarize};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = match PipelineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let mut cache = DatasetCache::new();
    let outcome = match &cli.command {
        Command::Ingest(args) => {
            run_ingest(&args.data_dir, &config, &mut cache).map(|result| print_ingest(&result))
        }
        Command::Clean(args) => run_clean(&args.data_dir, &args.flags, &config, &mut cache)
            .map(|result| print_clean(&result)),
        Command::Summarize(args) => run_summarize(
            &args.data_dir,
            args.source,
            &args.flags,
            &config,
            &mut cache,
        )
        .map(|result| print_summarize(&result)),
        Command::Run(args) => run_pipeline(&args.data_dir, &args.clean, &args.summary, &config)
            .map(|(cleaned, summarized)| {
                print_clean(&cleaned);
                print_summarize(&summarized);
            }),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
