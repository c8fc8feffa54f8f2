//! End-to-end runs of the command drivers against temporary directories.

use std::path::Path;

use solar_cli::cli::{CleanFlags, SourceArg, SummaryFlags};
use solar_cli::commands::{run_clean, run_ingest, run_pipeline, run_summarize};
use solar_cli::config::PipelineConfig;
use solar_ingest::DatasetCache;
use solar_report::ComparisonSource;
use tempfile::TempDir;

fn site_csv(base: f64, rows: usize) -> String {
    let mut content = String::from("Timestamp,GHI,DNI,DHI,ModA,ModB,Cleaning\n");
    for idx in 0..rows {
        let ghi = if idx == rows - 1 {
            format!("{}", base * 40.0)
        } else {
            format!("{}", base + (idx % 11) as f64)
        };
        content.push_str(&format!(
            "2022-05-{:02}T{:02}:00:00,{ghi},{},{},{},{},{}\n",
            1 + idx / 24,
            idx % 24,
            base / 2.0 + (idx % 7) as f64,
            base / 4.0 + (idx % 3) as f64,
            base + (idx % 5) as f64,
            base + (idx % 4) as f64,
            usize::from(idx % 9 == 0)
        ));
    }
    content
}

fn write_sites(dir: &Path) {
    std::fs::write(dir.join("benin-malanville.csv"), site_csv(250.0, 96)).unwrap();
    std::fs::write(dir.join("sierraleone-bumbuna.csv"), site_csv(190.0, 72)).unwrap();
    std::fs::write(dir.join("togo-dapaong.csv"), site_csv(225.0, 80)).unwrap();
    std::fs::write(dir.join("broken.csv"), "").unwrap();
}

fn report_flags(dir: &Path) -> SummaryFlags {
    SummaryFlags {
        report: Some(dir.join("metrics").join("country_summary.json")),
        ..SummaryFlags::default()
    }
}

#[test]
fn ingest_reports_loaded_and_skipped_files() {
    let dir = TempDir::new().unwrap();
    write_sites(dir.path());
    let mut cache = DatasetCache::new();

    let result = run_ingest(dir.path(), &PipelineConfig::default(), &mut cache).unwrap();

    assert_eq!(result.rows, 96 + 72 + 80);
    assert_eq!(result.loaded.len(), 3);
    assert_eq!(result.skipped.len(), 1);
    assert!(result.skipped[0].path.ends_with("broken.csv"));
    assert_eq!(
        result.groups,
        vec![
            ("benin".to_string(), 96),
            ("sierraleone".to_string(), 72),
            ("togo".to_string(), 80),
        ]
    );
    assert_eq!(cache.len(), 1);
}

#[test]
fn ingest_missing_directory_is_an_error() {
    let mut cache = DatasetCache::new();
    let error = run_ingest(
        Path::new("/nonexistent/solar-data"),
        &PipelineConfig::default(),
        &mut cache,
    )
    .unwrap_err();
    assert!(format!("{error:#}").contains("/nonexistent/solar-data"));
}

#[test]
fn pipeline_exports_and_ranks_countries() {
    let dir = TempDir::new().unwrap();
    write_sites(dir.path());
    let out = dir.path().join("clean");
    let clean = CleanFlags {
        output_dir: Some(out.clone()),
        ..CleanFlags::default()
    };

    let (cleaned, summarized) = run_pipeline(
        dir.path(),
        &clean,
        &report_flags(dir.path()),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(cleaned.output_dir, out);
    assert_eq!(cleaned.export.exported.len(), 3);
    assert!(out.join("benin_clean.csv").is_file());
    assert!(cleaned.export.exported.iter().all(|g| g.outlier_rows_removed >= 1));

    assert_eq!(summarized.source, ComparisonSource::Exported);
    assert_eq!(summarized.rows, cleaned.export.total_rows());
    let report = &summarized.outcome.report;
    assert_eq!(
        report.ranked_groups("GHI"),
        vec!["benin", "togo", "sierraleone"]
    );
    assert!(report.tests.contains_key("GHI"));
    assert!(summarized.report_path.is_file());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summarized.report_path).unwrap()).unwrap();
    assert!(written["summary"]["GHI"]["togo"]["mean"].is_number());
}

#[test]
fn summarize_raw_source_reads_input_files() {
    let dir = TempDir::new().unwrap();
    write_sites(dir.path());
    let mut cache = DatasetCache::new();

    let result = run_summarize(
        dir.path(),
        Some(SourceArg::Raw),
        &report_flags(dir.path()),
        &PipelineConfig::default(),
        &mut cache,
    )
    .unwrap();

    assert_eq!(result.source, ComparisonSource::Raw);
    assert_eq!(result.rows, 96 + 72 + 80);
    assert_eq!(result.skipped_files.len(), 1);
    assert!(result.skipped_metrics().is_empty());
}

#[test]
fn summarize_empty_directory_fails() {
    let dir = TempDir::new().unwrap();
    let mut cache = DatasetCache::new();

    let error = run_summarize(
        dir.path(),
        None,
        &report_flags(dir.path()),
        &PipelineConfig::default(),
        &mut cache,
    )
    .unwrap_err();

    assert!(format!("{error:#}").contains("no usable rows"));
    assert!(!dir.path().join("metrics").exists());
}

#[test]
fn config_file_settings_apply_and_flags_win() {
    let dir = TempDir::new().unwrap();
    write_sites(dir.path());
    let config_path = dir.path().join("solar.toml");
    std::fs::write(
        &config_path,
        "[clean]\nfill_strategy = \"zero\"\nzscore = 2.5\n\n[summary]\nmetrics = [\"DNI\"]\nprimary_metric = \"DNI\"\n",
    )
    .unwrap();
    let config = PipelineConfig::load(Some(&config_path)).unwrap();
    let mut cache = DatasetCache::new();

    let flags = SummaryFlags {
        metrics: vec!["GHI".to_string(), "Missing".to_string()],
        primary: Some("GHI".to_string()),
        report: Some(dir.path().join("report.json")),
    };
    let result = run_summarize(
        dir.path(),
        Some(SourceArg::Raw),
        &flags,
        &config,
        &mut cache,
    )
    .unwrap();

    let report = &result.outcome.report;
    assert!(report.summary.contains_key("GHI"));
    assert!(!report.summary.contains_key("DNI"));
    assert_eq!(result.skipped_metrics().len(), 1);
    assert_eq!(result.skipped_metrics()[0].0, "Missing");
    assert_eq!(result.report_path, dir.path().join("report.json"));
}

#[test]
fn clean_defaults_output_to_data_dir() {
    let dir = TempDir::new().unwrap();
    write_sites(dir.path());
    let mut cache = DatasetCache::new();

    let result = run_clean(
        dir.path(),
        &CleanFlags::default(),
        &PipelineConfig::default(),
        &mut cache,
    )
    .unwrap();

    assert_eq!(result.output_dir, dir.path());
    assert!(dir.path().join("togo_clean.csv").is_file());

    // A second clean must not merge the artifacts it just wrote.
    let again = run_clean(
        dir.path(),
        &CleanFlags::default(),
        &PipelineConfig::default(),
        &mut cache,
    )
    .unwrap();
    assert_eq!(again.input_rows, result.input_rows);
}
