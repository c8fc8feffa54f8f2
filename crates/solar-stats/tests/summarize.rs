//! Summaries over multi-group frames.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use solar_model::{ConfigError, RankEntry, SummaryOptions};
use solar_stats::{StatsError, summarize};

fn three_sites() -> DataFrame {
    let mut groups = Vec::new();
    let mut ghi = Vec::new();
    for (group, base) in [("benin", 240.0), ("sierraleone", 185.0), ("togo", 220.0)] {
        for idx in 0..100 {
            groups.push(group);
            ghi.push(base + f64::from(idx % 10) * 4.0);
        }
    }
    DataFrame::new(vec![
        Series::new("group".into(), groups).into_column(),
        Series::new("GHI".into(), ghi).into_column(),
    ])
    .unwrap()
}

#[test]
fn three_groups_are_ranked_and_tested() {
    let outcome = summarize(&three_sites(), &SummaryOptions::default()).unwrap();
    let report = outcome.report;

    assert_eq!(
        report.ranked_groups("GHI"),
        vec!["benin", "togo", "sierraleone"]
    );
    let benin = report.summary["GHI"]["benin"];
    assert_eq!(benin.count, 100);
    assert!((benin.mean.unwrap() - 258.0).abs() < 1e-9);
    assert!((benin.median.unwrap() - 258.0).abs() < 1e-9);

    let tests = report.tests["GHI"];
    assert!(tests.anova_f.unwrap() > 0.0);
    assert!(tests.anova_p.is_some());
    assert!(tests.kruskal_h.unwrap() > 0.0);
    assert!(tests.kruskal_p.is_some());

    // DNI and DHI are requested by default but absent.
    let skipped: Vec<&str> = outcome
        .skipped_metrics
        .iter()
        .map(|(metric, _)| metric.as_str())
        .collect();
    assert_eq!(skipped, vec!["DNI", "DHI"]);
    assert!(matches!(
        outcome.skipped_metrics[0].1,
        ConfigError::MetricNotFound { .. }
    ));
    assert!(!report.summary.contains_key("DNI"));
}

#[test]
fn ranking_matches_reference_example() {
    let df = DataFrame::new(vec![
        Series::new("group".into(), vec!["groupA", "groupB", "groupC"]).into_column(),
        Series::new("GHI".into(), vec![120.5, 98.2, 150.0]).into_column(),
    ])
    .unwrap();
    let report = summarize(&df, &SummaryOptions::default().with_metrics(["GHI"]))
        .unwrap()
        .report;
    assert_eq!(
        report.ranking["GHI"],
        vec![
            RankEntry::new("groupC", 150.0),
            RankEntry::new("groupA", 120.5),
            RankEntry::new("groupB", 98.2),
        ]
    );
}

#[test]
fn single_group_omits_tests() {
    let df = DataFrame::new(vec![
        Series::new("group".into(), vec!["benin"; 3]).into_column(),
        Series::new("GHI".into(), vec![1.0, 2.0, 3.0]).into_column(),
    ])
    .unwrap();
    let report = summarize(&df, &SummaryOptions::default()).unwrap().report;
    assert!(report.tests.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tests"], serde_json::json!({}));
    assert!(json.get("cleaning_gain").is_none());
}

#[test]
fn all_missing_group_is_listed_but_not_ranked() {
    let df = DataFrame::new(vec![
        Series::new("group".into(), vec!["benin", "benin", "togo", "togo"]).into_column(),
        Series::new("GHI".into(), vec![Some(1.0), Some(3.0), None, None]).into_column(),
    ])
    .unwrap();
    let report = summarize(&df, &SummaryOptions::default()).unwrap().report;

    let togo = report.summary["GHI"]["togo"];
    assert_eq!(togo.count, 0);
    assert_eq!(togo.mean, None);
    assert_eq!(report.ranked_groups("GHI"), vec!["benin"]);
    assert!(report.tests.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["summary"]["GHI"]["togo"]["mean"].is_null());
}

#[test]
fn cleaning_gain_per_module() {
    let df = DataFrame::new(vec![
        Series::new("group".into(), vec!["benin", "benin", "benin", "togo"]).into_column(),
        Series::new("GHI".into(), vec![1.0, 2.0, 3.0, 4.0]).into_column(),
        Series::new("Cleaning".into(), vec![0i64, 1, 1, 1]).into_column(),
        Series::new("ModA".into(), vec![100.0, 110.0, 130.0, 90.0]).into_column(),
    ])
    .unwrap();
    let report = summarize(&df, &SummaryOptions::default().with_metrics(["GHI"]))
        .unwrap()
        .report;
    assert_eq!(report.cleaning_gain["benin"]["ModA"], 20.0);
    // No pre-cleaning rows: the missing side counts as zero.
    assert_eq!(report.cleaning_gain["togo"]["ModA"], 90.0);
    assert!(!report.cleaning_gain["benin"].contains_key("ModB"));
}

#[test]
fn missing_group_column_is_a_config_error() {
    let df = DataFrame::new(vec![Series::new("GHI".into(), vec![1.0]).into_column()]).unwrap();
    let result = summarize(&df, &SummaryOptions::default());
    assert!(matches!(
        result,
        Err(StatsError::Config(ConfigError::GroupColumnNotFound { .. }))
    ));
}

#[test]
fn empty_metric_list_is_rejected() {
    let options = SummaryOptions::default().with_metrics(Vec::<String>::new());
    let result = summarize(&three_sites(), &options);
    assert!(matches!(
        result,
        Err(StatsError::Config(ConfigError::EmptyColumnList { .. }))
    ));
}
