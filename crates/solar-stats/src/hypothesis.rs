//! One-way ANOVA and Kruskal-Wallis H tests across groups.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

use solar_common::mean;
use solar_model::HypothesisTests;

/// A test statistic with its p-value; either is `None` when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TestResult {
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// One-way ANOVA F test.
///
/// Needs at least two non-empty groups and more observations than groups.
/// The statistic is undefined when every group has zero internal variance.
pub fn one_way_anova(groups: &[&[f64]]) -> TestResult {
    let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if k < 2 || n <= k {
        return TestResult::default();
    }
    let all: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let Some(grand_mean) = mean(&all) else {
        return TestResult::default();
    };

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let Some(group_mean) = mean(group) else {
            continue;
        };
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }
    if ss_within <= 0.0 {
        return TestResult::default();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let p_value = FisherSnedecor::new(df_between, df_within)
        .ok()
        .map(|dist| dist.sf(f));
    TestResult {
        statistic: finite(f),
        p_value: p_value.and_then(finite),
    }
}

/// Kruskal-Wallis H test with average ranks and tie correction.
///
/// Undefined when fewer than two non-empty groups exist or all values tie.
pub fn kruskal_wallis(groups: &[&[f64]]) -> TestResult {
    let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    if k < 2 {
        return TestResult::default();
    }

    let mut pooled: Vec<(f64, usize)> = groups
        .iter()
        .enumerate()
        .flat_map(|(idx, g)| g.iter().map(move |v| (*v, idx)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));
    let n = pooled.len();

    let mut rank_sums = vec![0.0; k];
    let mut tie_sum = 0.0;
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && pooled[end].0 == pooled[start].0 {
            end += 1;
        }
        // Ranks are 1-based; a tie block shares the mean of its positions.
        let average_rank = (start + end + 1) as f64 / 2.0;
        for &(_, idx) in &pooled[start..end] {
            rank_sums[idx] += average_rank;
        }
        let t = (end - start) as f64;
        tie_sum += t.powi(3) - t;
        start = end;
    }

    let n_f = n as f64;
    let correction = 1.0 - tie_sum / (n_f.powi(3) - n_f);
    if correction <= 0.0 {
        return TestResult::default();
    }
    let h_raw = 12.0 / (n_f * (n_f + 1.0))
        * groups
            .iter()
            .zip(&rank_sums)
            .map(|(g, r)| r * r / g.len() as f64)
            .sum::<f64>()
        - 3.0 * (n_f + 1.0);
    let h = (h_raw / correction).max(0.0);
    let p_value = ChiSquared::new((k - 1) as f64)
        .ok()
        .map(|dist| dist.sf(h));
    TestResult {
        statistic: finite(h),
        p_value: p_value.and_then(finite),
    }
}

/// Runs both tests when at least two groups have observations.
///
/// Returns `None` otherwise so the caller can omit the section.
pub fn hypothesis_tests(groups: &[&[f64]]) -> Option<HypothesisTests> {
    let usable = groups.iter().filter(|g| !g.is_empty()).count();
    if usable < 2 {
        return None;
    }
    let anova = one_way_anova(groups);
    let kruskal = kruskal_wallis(groups);
    Some(HypothesisTests {
        anova_f: anova.statistic,
        anova_p: anova.p_value,
        kruskal_h: kruskal.statistic,
        kruskal_p: kruskal.p_value,
    })
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
