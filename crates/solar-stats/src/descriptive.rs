//! Count, mean, median and population standard deviation.

use solar_common::{mean, median, population_std};
use solar_model::GroupStats;

/// Describes the non-missing values of one group.
pub fn describe(values: &[f64]) -> GroupStats {
    GroupStats {
        count: values.len(),
        mean: mean(values),
        median: median(values),
        std: population_std(values),
    }
}
