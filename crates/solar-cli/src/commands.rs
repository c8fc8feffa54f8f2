use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use solar_ingest::{DatasetCache, group_row_counts};
use solar_report::{ComparisonSource, export_groups, load_comparison_frame, write_report};
use solar_stats::summarize;

use crate::cli::{CleanFlags, SourceArg, SummaryFlags};
use crate::config::PipelineConfig;
use crate::types::{CleanResult, IngestResult, SummarizeResult};

pub fn run_ingest(
    data_dir: &Path,
    config: &PipelineConfig,
    cache: &mut DatasetCache,
) -> Result<IngestResult> {
    let span = info_span!("ingest", data_dir = %data_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let merged = cache
        .get_or_load(data_dir, &config.ingest_options())
        .with_context(|| format!("load measurements from {}", data_dir.display()))?;
    let groups = group_row_counts(&merged.data).context("count rows per group")?;
    info!(
        files = merged.loaded.len(),
        groups = groups.len(),
        skipped = merged.skipped.len(),
        rows = merged.row_count(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        data_dir: data_dir.to_path_buf(),
        rows: merged.row_count(),
        columns: merged.data.width(),
        groups,
        loaded: merged.loaded.clone(),
        skipped: merged.skipped.clone(),
    })
}

pub fn run_clean(
    data_dir: &Path,
    flags: &CleanFlags,
    config: &PipelineConfig,
    cache: &mut DatasetCache,
) -> Result<CleanResult> {
    let config = with_clean_flags(config, flags);
    let options = config
        .export_options()
        .context("invalid cleaning settings")?;
    let output_dir = config
        .output
        .output_dir
        .clone()
        .unwrap_or_else(|| data_dir.to_path_buf());

    let span = info_span!(
        "clean",
        data_dir = %data_dir.display(),
        output_dir = %output_dir.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let merged = cache
        .get_or_load(data_dir, &config.ingest_options())
        .with_context(|| format!("load measurements from {}", data_dir.display()))?;
    let export = export_groups(&merged.data, &output_dir, &options)
        .with_context(|| format!("export cleaned groups to {}", output_dir.display()))?;
    info!(
        groups = export.exported.len(),
        rows = export.total_rows(),
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok(CleanResult {
        output_dir,
        input_rows: merged.row_count(),
        export,
        skipped_files: merged.skipped.clone(),
    })
}

pub fn run_summarize(
    data_dir: &Path,
    source: Option<SourceArg>,
    flags: &SummaryFlags,
    config: &PipelineConfig,
    cache: &mut DatasetCache,
) -> Result<SummarizeResult> {
    let config = with_summary_flags(config, flags);
    let options = config
        .summary_options()
        .context("invalid summary settings")?;
    let preprocess = config
        .preprocess_options()
        .context("invalid cleaning settings")?;
    let source = match source {
        Some(arg) => source_from_arg(arg),
        None => config.comparison_source()?,
    };

    let span = info_span!("summarize", data_dir = %data_dir.display(), source = %source);
    let _guard = span.enter();
    let start = Instant::now();

    let frame = load_comparison_frame(
        data_dir,
        source,
        &config.ingest_options(),
        &preprocess,
        cache,
    )
    .with_context(|| format!("load comparison input from {}", data_dir.display()))?;
    if frame.data.height() == 0 {
        bail!("no usable rows found in {}", data_dir.display());
    }

    let outcome = summarize(&frame.data, &options).context("summarize groups")?;
    let report_path = config.output.report.clone();
    write_report(&outcome.report, &report_path)
        .with_context(|| format!("write report {}", report_path.display()))?;
    info!(
        rows = frame.data.height(),
        metrics = outcome.report.summary.len(),
        duration_ms = start.elapsed().as_millis(),
        "summarize complete"
    );
    Ok(SummarizeResult {
        source: frame.source,
        report_path,
        rows: frame.data.height(),
        outcome,
        skipped_files: frame.skipped,
    })
}

/// `clean` followed by `summarize --source exported` on the written files.
pub fn run_pipeline(
    data_dir: &Path,
    clean: &CleanFlags,
    summary: &SummaryFlags,
    config: &PipelineConfig,
) -> Result<(CleanResult, SummarizeResult)> {
    let mut cache = DatasetCache::new();
    let cleaned = run_clean(data_dir, clean, config, &mut cache)?;
    let summarized = run_summarize(
        &cleaned.output_dir,
        Some(SourceArg::Exported),
        summary,
        config,
        &mut cache,
    )?;
    Ok((cleaned, summarized))
}

fn with_clean_flags(config: &PipelineConfig, flags: &CleanFlags) -> PipelineConfig {
    let mut config = config.clone();
    if let Some(dir) = &flags.output_dir {
        config.output.output_dir = Some(dir.clone());
    }
    if let Some(strategy) = &flags.fill_strategy {
        config.clean.fill_strategy = strategy.clone();
    }
    if let Some(policy) = &flags.all_missing {
        config.clean.all_missing = policy.clone();
    }
    if let Some(zscore) = flags.zscore {
        config.clean.zscore = zscore;
    }
    config
}

fn with_summary_flags(config: &PipelineConfig, flags: &SummaryFlags) -> PipelineConfig {
    let mut config = config.clone();
    if !flags.metrics.is_empty() {
        config.summary.metrics = flags.metrics.clone();
    }
    if let Some(primary) = &flags.primary {
        config.summary.primary_metric = primary.clone();
    }
    if let Some(report) = &flags.report {
        config.output.report = report.clone();
    }
    config
}

fn source_from_arg(arg: SourceArg) -> ComparisonSource {
    match arg {
        SourceArg::Auto => ComparisonSource::Auto,
        SourceArg::Exported => ComparisonSource::Exported,
        SourceArg::Raw => ComparisonSource::Raw,
    }
}
