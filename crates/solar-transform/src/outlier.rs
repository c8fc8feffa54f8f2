//! Sequential z-score outlier rejection.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use solar_common::{column_f64_values, is_numeric_dtype, mean, population_std};
use solar_model::OutlierOptions;

use crate::error::Result;

/// Statistics and effect of filtering on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierPass {
    pub column: String,
    /// Mean of the rows entering this pass.
    pub mean: f64,
    /// Population standard deviation of the rows entering this pass.
    pub std: f64,
    /// Largest retained absolute deviation, `threshold * std`.
    pub bound: f64,
    pub rows_before: usize,
    pub rows_after: usize,
}

#[derive(Debug, Clone)]
pub struct OutlierOutcome {
    pub data: DataFrame,
    pub passes: Vec<OutlierPass>,
}

impl OutlierOutcome {
    pub fn rows_removed(&self) -> usize {
        self.passes
            .iter()
            .map(|pass| pass.rows_before - pass.rows_after)
            .sum()
    }
}

/// Removes rows more than `threshold` standard deviations from the mean.
///
/// Columns are processed in the order given, each on the rows that survived
/// the previous ones, with statistics recomputed on entry. Rows with a
/// missing value in a processed column are removed. Columns that are
/// absent, non-numeric, or have zero or undefined deviation are skipped.
pub fn zscore_filter(df: &DataFrame, options: &OutlierOptions) -> Result<OutlierOutcome> {
    options.validate()?;

    let mut data = df.clone();
    let mut passes = Vec::new();
    for name in &options.columns {
        let Ok(column) = data.column(name) else {
            continue;
        };
        if !is_numeric_dtype(column.dtype()) {
            debug!(column = %name, "not numeric, outlier pass skipped");
            continue;
        }
        let values = column_f64_values(column)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let (Some(mu), Some(sd)) = (mean(&present), population_std(&present)) else {
            continue;
        };
        if !sd.is_finite() || sd <= 0.0 {
            continue;
        }
        let bound = options.threshold * sd;
        let keep: Vec<bool> = values
            .iter()
            .map(|value| value.is_some_and(|v| (v - mu).abs() <= bound))
            .collect();

        let rows_before = data.height();
        let mask = BooleanChunked::from_slice("zscore".into(), &keep);
        data = data.filter(&mask)?;
        debug!(
            column = %name,
            mean = mu,
            std = sd,
            removed = rows_before - data.height(),
            "outlier pass"
        );
        passes.push(OutlierPass {
            column: name.clone(),
            mean: mu,
            std: sd,
            bound,
            rows_before,
            rows_after: data.height(),
        });
    }

    Ok(OutlierOutcome { data, passes })
}
