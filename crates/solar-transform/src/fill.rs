//! Missing-value imputation for numeric columns.

use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{debug, warn};

use solar_common::{column_f64_values, is_numeric_dtype, mean, median};
use solar_model::{AllMissingPolicy, FillStrategy};

use crate::error::Result;

/// A column whose missing values were replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledColumn {
    pub column: String,
    /// Value written into every missing cell.
    pub value: f64,
    /// Number of cells filled.
    pub count: usize,
}

/// What imputation did, without the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub filled: Vec<FilledColumn>,
    /// Columns with no value to derive a fill from.
    pub all_missing: Vec<String>,
    /// Subset of `all_missing` removed under [`AllMissingPolicy::Drop`].
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub data: DataFrame,
    pub filled: Vec<FilledColumn>,
    pub all_missing: Vec<String>,
    pub dropped: Vec<String>,
}

impl FillOutcome {
    pub fn into_parts(self) -> (DataFrame, FillReport) {
        (
            self.data,
            FillReport {
                filled: self.filled,
                all_missing: self.all_missing,
                dropped: self.dropped,
            },
        )
    }
}

/// Fills nulls and NaNs in numeric columns.
///
/// `columns` restricts the work to the named columns; absent or non-numeric
/// names are skipped. With `None`, every numeric column is considered. A
/// column that needs filling is rewritten as Float64.
///
/// Median and mean have no value for a column with nothing but missing
/// cells; such columns are reported in `all_missing` and kept untouched or
/// dropped according to `policy`.
pub fn simple_fill_numeric(
    df: &DataFrame,
    columns: Option<&[String]>,
    strategy: FillStrategy,
    policy: AllMissingPolicy,
) -> Result<FillOutcome> {
    let targets: Vec<String> = match columns {
        Some(requested) => requested
            .iter()
            .filter(|name| match df.column(name) {
                Ok(column) if is_numeric_dtype(column.dtype()) => true,
                Ok(_) => {
                    debug!(column = %name, "not numeric, fill skipped");
                    false
                }
                Err(_) => {
                    debug!(column = %name, "column absent, fill skipped");
                    false
                }
            })
            .cloned()
            .collect(),
        None => df
            .get_columns()
            .iter()
            .filter(|column| is_numeric_dtype(column.dtype()))
            .map(|column| column.name().to_string())
            .collect(),
    };

    let mut data = df.clone();
    let mut filled = Vec::new();
    let mut all_missing = Vec::new();
    let mut dropped = Vec::new();

    for name in targets {
        let values = column_f64_values(data.column(&name)?)?;
        let missing = values.iter().filter(|value| value.is_none()).count();
        if missing == 0 {
            continue;
        }
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let fill_value = match strategy {
            FillStrategy::Median => median(&present),
            FillStrategy::Mean => mean(&present),
            FillStrategy::Zero => Some(0.0),
        };
        let Some(fill_value) = fill_value else {
            warn!(column = %name, strategy = %strategy, policy = %policy, "column has no values to fill from");
            if policy == AllMissingPolicy::Drop {
                data = data.drop(&name)?;
                dropped.push(name.clone());
            }
            all_missing.push(name);
            continue;
        };

        let replaced: Vec<f64> = values
            .iter()
            .map(|value| value.unwrap_or(fill_value))
            .collect();
        data.with_column(Series::new(name.as_str().into(), replaced))?;
        debug!(column = %name, value = fill_value, count = missing, "missing values filled");
        filled.push(FilledColumn {
            column: name,
            value: fill_value,
            count: missing,
        });
    }

    Ok(FillOutcome {
        data,
        filled,
        all_missing,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataType, IntoColumn};

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("GHI".into(), &[Some(1.0), None, Some(3.0), Some(10.0)]).into_column(),
            Series::new("WS".into(), &[Some(2i64), Some(4), None, Some(4)]).into_column(),
            Series::new("RH".into(), &[Some(50.0), Some(60.0), Some(70.0), Some(80.0)])
                .into_column(),
            Series::new("Dead".into(), &[None::<f64>, None, None, None]).into_column(),
            Series::new("group".into(), &[Some("a"), None, Some("a"), Some("a")]).into_column(),
        ])
        .unwrap()
    }

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        column_f64_values(df.column(name).unwrap()).unwrap()
    }

    #[test]
    fn test_median_fill() {
        let outcome = simple_fill_numeric(
            &sample(),
            None,
            FillStrategy::Median,
            AllMissingPolicy::Keep,
        )
        .unwrap();
        assert_eq!(
            values(&outcome.data, "GHI"),
            vec![Some(1.0), Some(3.0), Some(3.0), Some(10.0)]
        );
        assert_eq!(
            values(&outcome.data, "WS"),
            vec![Some(2.0), Some(4.0), Some(4.0), Some(4.0)]
        );
        assert_eq!(outcome.data.column("WS").unwrap().dtype(), &DataType::Float64);
        assert_eq!(outcome.data.column("RH").unwrap().dtype(), &DataType::Float64);
        assert_eq!(outcome.filled.len(), 2);
        assert_eq!(outcome.all_missing, vec!["Dead".to_string()]);
        assert!(outcome.dropped.is_empty());
        assert_eq!(outcome.data.column("Dead").unwrap().null_count(), 4);
        // Text columns are never imputed.
        assert_eq!(outcome.data.column("group").unwrap().null_count(), 1);
    }

    #[test]
    fn test_mean_fill_and_drop_policy() {
        let outcome = simple_fill_numeric(
            &sample(),
            None,
            FillStrategy::Mean,
            AllMissingPolicy::Drop,
        )
        .unwrap();
        assert_eq!(
            values(&outcome.data, "GHI"),
            vec![Some(1.0), Some(14.0 / 3.0), Some(3.0), Some(10.0)]
        );
        assert_eq!(outcome.dropped, vec!["Dead".to_string()]);
        assert!(outcome.data.column("Dead").is_err());
    }

    #[test]
    fn test_zero_fill_covers_all_missing_columns() {
        let outcome = simple_fill_numeric(
            &sample(),
            None,
            FillStrategy::Zero,
            AllMissingPolicy::Drop,
        )
        .unwrap();
        assert!(outcome.all_missing.is_empty());
        assert_eq!(values(&outcome.data, "Dead"), vec![Some(0.0); 4]);
    }

    #[test]
    fn test_requested_columns_only() {
        let requested = vec!["WS".to_string(), "group".to_string(), "absent".to_string()];
        let outcome = simple_fill_numeric(
            &sample(),
            Some(&requested),
            FillStrategy::Zero,
            AllMissingPolicy::Keep,
        )
        .unwrap();
        assert_eq!(outcome.filled.len(), 1);
        assert_eq!(outcome.filled[0].column, "WS");
        assert_eq!(outcome.data.column("GHI").unwrap().null_count(), 1);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = DataFrame::new(vec![
            Series::new("GHI".into(), vec![1.0, f64::NAN, 5.0]).into_column(),
        ])
        .unwrap();
        let outcome =
            simple_fill_numeric(&df, None, FillStrategy::Median, AllMissingPolicy::Keep).unwrap();
        assert_eq!(
            values(&outcome.data, "GHI"),
            vec![Some(1.0), Some(3.0), Some(5.0)]
        );
    }
}
