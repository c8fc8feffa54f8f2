//! Property checks for cleaning, imputation and outlier filtering.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;
use solar_common::{column_f64_values, median};
use solar_model::{AllMissingPolicy, FillStrategy, OutlierOptions};
use solar_transform::{basic_clean, simple_fill_numeric, zscore_filter};

fn frame(ghi: &[Option<f64>], labels: &[String]) -> DataFrame {
    DataFrame::new(vec![
        Series::new("GHI".into(), ghi.to_vec()).into_column(),
        Series::new("group".into(), labels.to_vec()).into_column(),
    ])
    .unwrap()
}

fn rows() -> impl Strategy<Value = (Vec<Option<f64>>, Vec<String>)> {
    (1usize..40).prop_flat_map(|len| {
        (
            prop::collection::vec(prop::option::of((0i32..5).prop_map(f64::from)), len),
            prop::collection::vec(prop::sample::select(vec!["a", "b"]).prop_map(String::from), len),
        )
    })
}

proptest! {
    #[test]
    fn basic_clean_is_idempotent((ghi, labels) in rows()) {
        let df = frame(&ghi, &labels);
        let once = basic_clean(&df).unwrap();
        let twice = basic_clean(&once).unwrap();
        prop_assert!(once.equals_missing(&twice));
        prop_assert!(once.height() <= df.height());
    }

    #[test]
    fn median_fill_leaves_no_gaps(
        ghi in prop::collection::vec(prop::option::of(-500.0f64..1500.0), 1..60)
    ) {
        prop_assume!(ghi.iter().any(Option::is_some));
        let present: Vec<f64> = ghi.iter().flatten().copied().collect();
        let expected = median(&present).unwrap();
        let df = DataFrame::new(vec![Series::new("GHI".into(), ghi.clone()).into_column()]).unwrap();

        let outcome =
            simple_fill_numeric(&df, None, FillStrategy::Median, AllMissingPolicy::Keep).unwrap();
        let filled = column_f64_values(outcome.data.column("GHI").unwrap()).unwrap();
        for (before, after) in ghi.iter().zip(&filled) {
            match before {
                Some(value) => prop_assert_eq!(*after, Some(*value)),
                None => prop_assert_eq!(*after, Some(expected)),
            }
        }
    }

    #[test]
    fn zscore_filter_never_grows_and_honors_bounds(
        ghi in prop::collection::vec(prop::option::of(-100.0f64..1200.0), 0..80),
        dni_seed in prop::collection::vec(0.0f64..900.0, 80),
        threshold in 0.5f64..4.0,
    ) {
        let dni: Vec<f64> = dni_seed[..ghi.len()].to_vec();
        let df = DataFrame::new(vec![
            Series::new("GHI".into(), ghi).into_column(),
            Series::new("DNI".into(), dni).into_column(),
        ])
        .unwrap();
        let options = OutlierOptions::default().with_threshold(threshold);
        let outcome = zscore_filter(&df, &options).unwrap();

        prop_assert!(outcome.data.height() <= df.height());
        for pass in &outcome.passes {
            prop_assert!(pass.rows_after <= pass.rows_before);
            let values = column_f64_values(outcome.data.column(&pass.column).unwrap()).unwrap();
            for value in values {
                let value = value.unwrap();
                prop_assert!((value - pass.mean).abs() <= pass.bound);
            }
        }
    }
}
