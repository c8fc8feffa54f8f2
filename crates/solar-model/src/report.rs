//! Comparison report types.
//!
//! The serialized layout is:
//!
//! - `summary`: metric -> group -> statistic -> number | null
//! - `ranking`: metric -> `[[group, mean], ...]`, descending by mean
//! - `tests`: metric -> `{anova_f, anova_p, kruskal_h, kruskal_p}`
//! - `cleaning_gain` (only when present): group -> module column -> gain

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Descriptive statistics of one metric within one group.
///
/// `std` is the population standard deviation (denominator N).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

/// One `[group, mean]` pair of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry(pub String, pub f64);

impl RankEntry {
    pub fn new(group: impl Into<String>, mean: f64) -> Self {
        Self(group.into(), mean)
    }

    pub fn group(&self) -> &str {
        &self.0
    }

    pub fn mean(&self) -> f64 {
        self.1
    }
}

/// Significance tests across groups for one metric.
///
/// A statistic that is undefined for the data (for example zero variance
/// within every group) is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HypothesisTests {
    pub anova_f: Option<f64>,
    pub anova_p: Option<f64>,
    pub kruskal_h: Option<f64>,
    pub kruskal_p: Option<f64>,
}

/// Cross-group comparison produced by one summarization run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub summary: BTreeMap<String, BTreeMap<String, GroupStats>>,
    pub ranking: BTreeMap<String, Vec<RankEntry>>,
    pub tests: BTreeMap<String, HypothesisTests>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cleaning_gain: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ComparisonReport {
    /// Groups of a metric ranking, best first.
    pub fn ranked_groups(&self, metric: &str) -> Vec<&str> {
        self.ranking
            .get(metric)
            .map(|entries| entries.iter().map(RankEntry::group).collect())
            .unwrap_or_default()
    }
}
