//! Cross-group statistics for the solar comparison pipeline.
//!
//! Standard deviations are population standard deviations throughout.
//! p-values come from the F and chi-squared survival functions in `statrs`.

mod descriptive;
mod error;
mod hypothesis;
mod summarize;

pub use descriptive::describe;
pub use error::{Result, StatsError};
pub use hypothesis::{TestResult, hypothesis_tests, kruskal_wallis, one_way_anova};
pub use summarize::{SummaryOutcome, cleaning_gain, group_labels, rank_by_mean, summarize};
