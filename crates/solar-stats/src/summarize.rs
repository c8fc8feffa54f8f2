//! Cross-group summary: per-group statistics, rankings, significance tests.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, info, warn};

use solar_common::{column_f64_values, mean};
use solar_model::{
    CLEANING_FLAG_COLUMN, ComparisonReport, ConfigError, GroupStats, MODULE_COLUMNS, RankEntry,
    SummaryOptions,
};

use crate::descriptive::describe;
use crate::error::Result;
use crate::hypothesis::hypothesis_tests;

/// A report plus the metrics that could not be summarized.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub report: ComparisonReport,
    pub skipped_metrics: Vec<(String, ConfigError)>,
}

/// Summarizes `df` group by group.
///
/// Every group present in the group column appears in each metric's
/// summary, with `count = 0` when it has no values for that metric. Only
/// groups with values are ranked and tested. Metrics missing from the data
/// are reported in `skipped_metrics` and do not affect the others.
pub fn summarize(df: &DataFrame, options: &SummaryOptions) -> Result<SummaryOutcome> {
    options.validate()?;
    let labels = group_labels(df, &options.group_column)?;

    let mut report = ComparisonReport::default();
    let mut skipped_metrics = Vec::new();

    for metric in &options.metrics {
        let Ok(column) = df.column(metric) else {
            warn!(metric = %metric, "metric not found, skipped");
            skipped_metrics.push((
                metric.clone(),
                ConfigError::MetricNotFound {
                    metric: metric.clone(),
                },
            ));
            continue;
        };
        let grouped = group_values(&labels, column)?;
        let stats: BTreeMap<String, GroupStats> = grouped
            .iter()
            .map(|(group, values)| (group.clone(), describe(values)))
            .collect();
        let ranking = rank_by_mean(&stats);
        debug!(metric = %metric, groups = stats.len(), ranked = ranking.len(), "metric summarized");
        report.summary.insert(metric.clone(), stats);
        report.ranking.insert(metric.clone(), ranking);
    }

    match df.column(&options.primary_metric) {
        Ok(column) => {
            let grouped = group_values(&labels, column)?;
            let samples: Vec<&[f64]> = grouped.values().map(Vec::as_slice).collect();
            if let Some(tests) = hypothesis_tests(&samples) {
                report.tests.insert(options.primary_metric.clone(), tests);
            } else {
                info!(metric = %options.primary_metric, "fewer than two groups with data, tests omitted");
            }
        }
        Err(_) => {
            if !options.metrics.contains(&options.primary_metric) {
                warn!(metric = %options.primary_metric, "primary metric not found, tests omitted");
                skipped_metrics.push((
                    options.primary_metric.clone(),
                    ConfigError::MetricNotFound {
                        metric: options.primary_metric.clone(),
                    },
                ));
            }
        }
    }

    if df.column(CLEANING_FLAG_COLUMN).is_ok() {
        report.cleaning_gain = cleaning_gain(df, &labels)?;
    }

    Ok(SummaryOutcome {
        report,
        skipped_metrics,
    })
}

/// Ranks groups by mean, highest first; ties go to the smaller group name.
pub fn rank_by_mean(stats: &BTreeMap<String, GroupStats>) -> Vec<RankEntry> {
    let mut ranking: Vec<RankEntry> = stats
        .iter()
        .filter_map(|(group, stats)| stats.mean.map(|mean| RankEntry::new(group.clone(), mean)))
        .collect();
    ranking.sort_by(|a, b| {
        b.mean()
            .total_cmp(&a.mean())
            .then_with(|| a.group().cmp(b.group()))
    });
    ranking
}

/// Mean module output after cleaning minus before, per group and module.
///
/// Rows flagged `1` count as after cleaning and `0` as before; a side with
/// no rows contributes zero.
pub fn cleaning_gain(
    df: &DataFrame,
    labels: &[Option<String>],
) -> Result<BTreeMap<String, BTreeMap<String, f64>>> {
    let flags = column_f64_values(df.column(CLEANING_FLAG_COLUMN)?)?;
    let mut gains: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for module in MODULE_COLUMNS {
        let Ok(column) = df.column(module) else {
            continue;
        };
        let values = column_f64_values(column)?;
        let mut sides: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for ((label, flag), value) in labels.iter().zip(&flags).zip(&values) {
            let (Some(label), Some(flag), Some(value)) = (label, flag, value) else {
                continue;
            };
            let entry = sides.entry(label.as_str()).or_default();
            if *flag == 1.0 {
                entry.1.push(*value);
            } else if *flag == 0.0 {
                entry.0.push(*value);
            }
        }
        for (group, (before, after)) in sides {
            let gain = mean(&after).unwrap_or(0.0) - mean(&before).unwrap_or(0.0);
            gains
                .entry(group.to_string())
                .or_default()
                .insert(module.to_string(), gain);
        }
    }
    Ok(gains)
}

/// Reads the group column as optional strings, one per row.
pub fn group_labels(df: &DataFrame, group_column: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(group_column)
        .map_err(|_| ConfigError::GroupColumnNotFound {
            column: group_column.to_string(),
        })?;
    let casted = column.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Splits a metric's non-missing values by group.
///
/// Each labelled group gets an entry, possibly empty. Rows without a label
/// are ignored.
fn group_values(labels: &[Option<String>], column: &Column) -> Result<BTreeMap<String, Vec<f64>>> {
    let values = column_f64_values(column)?;
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (label, value) in labels.iter().zip(values) {
        let Some(label) = label else {
            continue;
        };
        let entry = grouped.entry(label.clone()).or_default();
        if let Some(value) = value {
            entry.push(value);
        }
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_by_mean_descending() {
        let stats = BTreeMap::from([
            ("groupA".to_string(), GroupStats { count: 1, mean: Some(120.5), ..Default::default() }),
            ("groupB".to_string(), GroupStats { count: 1, mean: Some(98.2), ..Default::default() }),
            ("groupC".to_string(), GroupStats { count: 1, mean: Some(150.0), ..Default::default() }),
        ]);
        let ranking = rank_by_mean(&stats);
        assert_eq!(
            ranking,
            vec![
                RankEntry::new("groupC", 150.0),
                RankEntry::new("groupA", 120.5),
                RankEntry::new("groupB", 98.2),
            ]
        );
    }

    #[test]
    fn test_rank_ties_and_empty_groups() {
        let stats = BTreeMap::from([
            ("togo".to_string(), GroupStats { count: 2, mean: Some(5.0), ..Default::default() }),
            ("benin".to_string(), GroupStats { count: 2, mean: Some(5.0), ..Default::default() }),
            ("sierraleone".to_string(), GroupStats::default()),
        ]);
        let ranking = rank_by_mean(&stats);
        let groups: Vec<&str> = ranking.iter().map(RankEntry::group).collect();
        assert_eq!(groups, vec!["benin", "togo"]);
    }
}
