use std::collections::BTreeSet;

use proptest::prelude::*;
use summary_lab::data::filter::filtered_indices;
use summary_lab::data::stats::{describe_values, median, MedianRule};
use summary_lab::{
    describe, filter, group_and_aggregate, AggregateSpec, Aggregator, Comparison, Dataset,
    Predicate, Record, Value,
};

const KEYS: [&str; 4] = ["north", "south", "east", "west"];

fn dataset_from(rows: &[(usize, i64)]) -> Dataset {
    let records = rows
        .iter()
        .enumerate()
        .map(|(id, &(k, v))| {
            Record::new()
                .with("id", id as i64)
                .with("k", KEYS[k])
                .with("v", v)
        })
        .collect();
    Dataset::with_columns(vec!["id".into(), "k".into(), "v".into()], records).unwrap()
}

fn rows() -> impl Strategy<Value = Vec<(usize, i64)>> {
    prop::collection::vec((0..KEYS.len(), -50i64..50), 0..30)
}

fn predicates() -> impl Strategy<Value = Vec<Predicate>> {
    let compare = (prop::sample::select(Comparison::ALL.to_vec()), -50i64..50)
        .prop_map(|(op, t)| Predicate::compare("v", op, t as f64));
    let equals = (0..KEYS.len()).prop_map(|k| Predicate::equals("k", KEYS[k]));
    prop::collection::vec(prop_oneof![compare, equals], 0..4)
}

fn ids(ds: &Dataset) -> Vec<i64> {
    ds.records()
        .iter()
        .map(|r| match r.get("id") {
            Some(Value::Integer(i)) => *i,
            other => panic!("unexpected id {other:?}"),
        })
        .collect()
}

proptest! {
    #[test]
    fn filter_is_an_ordered_subsequence(rows in rows(), preds in predicates()) {
        let ds = dataset_from(&rows);
        let out = filter(&ds, &preds).unwrap();
        let kept = ids(&out);
        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
        let indices = filtered_indices(&ds, &preds).unwrap();
        prop_assert_eq!(kept, indices.iter().map(|&i| i as i64).collect::<Vec<_>>());
    }

    #[test]
    fn filter_is_idempotent(rows in rows(), preds in predicates()) {
        let ds = dataset_from(&rows);
        let once = filter(&ds, &preds).unwrap();
        let twice = filter(&once, &preds).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_keeps_exactly_the_matching_rows(rows in rows(), threshold in -50i64..50) {
        let ds = dataset_from(&rows);
        let out = filter(&ds, &[Predicate::at_least("v", threshold as f64)]).unwrap();
        let expected = rows.iter().filter(|(_, v)| *v >= threshold).count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn groups_partition_the_dataset(rows in rows()) {
        let ds = dataset_from(&rows);
        let groups = group_and_aggregate(&ds, Some("k"), &[AggregateSpec::mean("v")]).unwrap();

        let mut seen = BTreeSet::new();
        for g in &groups {
            prop_assert!(g.count > 0);
            prop_assert_eq!(g.count, g.rows.len());
            for &row in &g.rows {
                prop_assert!(seen.insert(row), "row {} in two groups", row);
                prop_assert_eq!(ds.records()[row].get("k"), g.key.as_ref());
            }
            let direct = g.rows.iter().map(|&r| rows[r].1 as f64).sum::<f64>() / g.count as f64;
            prop_assert_eq!(g.get("v", Aggregator::Mean), Some(direct));
        }
        prop_assert_eq!(seen.len(), ds.len());

        let keys: BTreeSet<_> = groups.iter().map(|g| g.key.clone()).collect();
        prop_assert_eq!(keys.len(), groups.len());
    }

    #[test]
    fn describe_bounds(rows in rows()) {
        let ds = dataset_from(&rows);
        let stats = describe(&ds, "v").unwrap();
        prop_assert_eq!(stats.count, rows.len());
        if rows.is_empty() {
            prop_assert!(stats.is_degenerate());
        } else {
            prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            prop_assert!(rows.iter().any(|&(_, v)| v as f64 == stats.mode));
        }
    }

    #[test]
    fn median_rules_agree_on_odd_counts(mut values in prop::collection::vec(-1000i32..1000, 1..25)) {
        if values.len() % 2 == 0 {
            values.pop();
        }
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        prop_assert_eq!(
            median(&values, MedianRule::UpperMiddle),
            median(&values, MedianRule::Midpoint)
        );
        prop_assert_eq!(describe_values(&values).median, median(&values, MedianRule::UpperMiddle).unwrap());
    }
}
