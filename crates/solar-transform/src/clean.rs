//! Column-name normalization and duplicate-row removal.

use std::collections::{HashMap, HashSet};

use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, IntoColumn, NamedFrom, NewChunkedArray, Series,
};
use tracing::{debug, warn};

use solar_common::{any_to_string, column_f64_values, is_numeric_dtype, row_key};

use crate::error::Result;

/// Trims column names and drops rows identical to an earlier row.
///
/// Columns whose names collide after trimming are merged into one, taking
/// the first present value per row. The first occurrence of each row is kept
/// in its original position.
pub fn basic_clean(df: &DataFrame) -> Result<DataFrame> {
    let data = trim_column_names(df)?;

    if data.height() == 0 {
        return Ok(data);
    }

    let mut seen = HashSet::with_capacity(data.height());
    let keep: Vec<bool> = (0..data.height())
        .map(|idx| seen.insert(row_key(&data, idx)))
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok(data);
    }

    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let deduped = data.filter(&mask)?;
    debug!(removed, rows = deduped.height(), "duplicate rows removed");
    Ok(deduped)
}

fn trim_column_names(df: &DataFrame) -> Result<DataFrame> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<&Column>> = HashMap::new();
    for column in df.get_columns() {
        let trimmed = column.name().trim().to_string();
        members
            .entry(trimmed.clone())
            .or_insert_with(|| {
                order.push(trimmed);
                Vec::new()
            })
            .push(column);
    }

    let mut columns = Vec::with_capacity(order.len());
    for name in &order {
        let group = members.get(name).map(Vec::as_slice).unwrap_or_default();
        match group {
            [] => {}
            [single] => {
                let mut column = (*single).clone();
                column.rename(name.as_str().into());
                columns.push(column);
            }
            several => {
                warn!(
                    column = %name,
                    merged = several.len(),
                    "columns merged after trimming names"
                );
                columns.push(coalesce(name, several)?);
            }
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// First non-missing value per row across `columns`.
///
/// All-numeric inputs give Float64, anything else gives String.
fn coalesce(name: &str, columns: &[&Column]) -> Result<Column> {
    let height = columns.first().map_or(0, |column| column.len());
    if columns.iter().all(|column| is_numeric_dtype(column.dtype())) {
        let mut merged: Vec<Option<f64>> = vec![None; height];
        for column in columns {
            for (slot, value) in merged.iter_mut().zip(column_f64_values(column)?) {
                if slot.is_none() {
                    *slot = value;
                }
            }
        }
        return Ok(Series::new(name.into(), merged).into_column());
    }

    let mut merged: Vec<Option<String>> = vec![None; height];
    for column in columns {
        for (idx, slot) in merged.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let value = column.get(idx)?;
            if !matches!(value, AnyValue::Null) {
                *slot = Some(any_to_string(value));
            }
        }
    }
    Ok(Series::new(name.into(), merged).into_column())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_column_names() {
        let df = DataFrame::new(vec![
            Series::new(" GHI ".into(), vec![1.0]).into_column(),
            Series::new("Tamb\t".into(), vec![20.0]).into_column(),
        ])
        .unwrap();
        let cleaned = basic_clean(&df).unwrap();
        let names: Vec<String> = cleaned
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["GHI", "Tamb"]);
    }

    #[test]
    fn test_drops_duplicates_keeping_first() {
        let df = DataFrame::new(vec![
            Series::new("GHI".into(), vec![1.0, 2.0, 1.0, 3.0, 2.0]).into_column(),
            Series::new("group".into(), vec!["a", "a", "a", "a", "b"]).into_column(),
        ])
        .unwrap();
        let cleaned = basic_clean(&df).unwrap();
        assert_eq!(cleaned.height(), 4);
        let ghi: Vec<f64> = cleaned
            .column("GHI")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ghi, vec![1.0, 2.0, 3.0, 2.0]);
    }

    #[test]
    fn test_null_rows_are_duplicates_of_each_other() {
        let df = DataFrame::new(vec![
            Series::new("GHI".into(), &[None::<f64>, None, Some(1.0)]).into_column(),
        ])
        .unwrap();
        assert_eq!(basic_clean(&df).unwrap().height(), 2);
    }

    #[test]
    fn test_names_colliding_after_trim_are_merged() {
        let df = DataFrame::new(vec![
            Series::new("GHI".into(), &[Some(1.0), None, None]).into_column(),
            Series::new("site".into(), &["a", "a", "b"]).into_column(),
            Series::new("GHI ".into(), &[None, None, Some(3i64)]).into_column(),
            Series::new(" site".into(), &[None::<&str>, Some("x"), Some("y")]).into_column(),
        ])
        .unwrap();
        let cleaned = basic_clean(&df).unwrap();

        let names: Vec<String> = cleaned
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["GHI", "site"]);
        let ghi: Vec<Option<f64>> = cleaned
            .column("GHI")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ghi, vec![Some(1.0), None, Some(3.0)]);
        let site: Vec<Option<&str>> = cleaned
            .column("site")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(site, vec![Some("a"), Some("a"), Some("b")]);
    }
}
