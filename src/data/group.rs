use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::error::InputError;
use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Aggregation descriptors
// ---------------------------------------------------------------------------

/// Reduction applied to one numeric field of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    Mean,
    Sum,
    Min,
    Max,
}

impl Aggregator {
    pub const ALL: [Aggregator; 4] = [
        Aggregator::Mean,
        Aggregator::Sum,
        Aggregator::Min,
        Aggregator::Max,
    ];

    /// Reduce a non-empty slice.
    fn apply(self, values: &[f64]) -> f64 {
        match self {
            Aggregator::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregator::Sum => values.iter().sum(),
            Aggregator::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregator::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Aggregator::Mean => "mean",
            Aggregator::Sum => "sum",
            Aggregator::Min => "min",
            Aggregator::Max => "max",
        }
    }
}

/// A (field, aggregator) pair requested from [`group_and_aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateSpec {
    pub field: String,
    pub aggregator: Aggregator,
}

impl AggregateSpec {
    pub fn new(field: impl Into<String>, aggregator: Aggregator) -> Self {
        AggregateSpec {
            field: field.into(),
            aggregator,
        }
    }

    pub fn mean(field: impl Into<String>) -> Self {
        Self::new(field, Aggregator::Mean)
    }
}

impl fmt::Display for AggregateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.aggregator.name(), self.field)
    }
}

// ---------------------------------------------------------------------------
// Group summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateValue {
    pub field: String,
    pub aggregator: Aggregator,
    pub value: f64,
}

/// One partition of a dataset: its key, size, members and aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    /// Group key value; `None` for the whole-dataset group.
    pub key: Option<Value>,
    pub count: usize,
    /// Row indices (into the grouped dataset) of the members, in order.
    pub rows: Vec<usize>,
    /// One entry per requested [`AggregateSpec`], same order.
    pub aggregates: Vec<AggregateValue>,
}

impl AggregateSummary {
    pub fn get(&self, field: &str, aggregator: Aggregator) -> Option<f64> {
        self.aggregates
            .iter()
            .find(|a| a.field == field && a.aggregator == aggregator)
            .map(|a| a.value)
    }

    /// Key label for tables and chart axes.
    pub fn label(&self) -> String {
        match &self.key {
            Some(v) => v.to_string(),
            None => "Total".to_string(),
        }
    }
}

/// Partition row indices by the raw value of `key`, in first-occurrence order.
pub fn group_indices(dataset: &Dataset, key: &str) -> Result<Vec<(Value, Vec<usize>)>, InputError> {
    dataset.require_field(key)?;

    let mut position: HashMap<&Value, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();

    for (row, record) in dataset.records().iter().enumerate() {
        let value = record
            .get(key)
            .ok_or_else(|| InputError::unknown_field(key))?;
        match position.get(value) {
            Some(&slot) => groups[slot].1.push(row),
            None => {
                position.insert(value, groups.len());
                groups.push((value.clone(), vec![row]));
            }
        }
    }
    Ok(groups)
}

/// Group `dataset` by `group_key` and compute `aggregates` for every group.
///
/// A missing or empty key treats the whole dataset as one group (or no group
/// at all when the dataset is empty, since groups are never empty).
pub fn group_and_aggregate(
    dataset: &Dataset,
    group_key: Option<&str>,
    aggregates: &[AggregateSpec],
) -> Result<Vec<AggregateSummary>, InputError> {
    for spec in aggregates {
        dataset.require_field(&spec.field)?;
    }

    let partitions: Vec<(Option<Value>, Vec<usize>)> = match group_key.filter(|k| !k.is_empty()) {
        Some(key) => group_indices(dataset, key)?
            .into_iter()
            .map(|(value, rows)| (Some(value), rows))
            .collect(),
        None if dataset.is_empty() => Vec::new(),
        None => vec![(None, (0..dataset.len()).collect())],
    };

    let mut summaries = Vec::with_capacity(partitions.len());
    for (key, rows) in partitions {
        let mut values = Vec::with_capacity(aggregates.len());
        for spec in aggregates {
            let column = rows
                .iter()
                .map(|&row| dataset.numeric(row, &spec.field))
                .collect::<Result<Vec<f64>, _>>()?;
            values.push(AggregateValue {
                field: spec.field.clone(),
                aggregator: spec.aggregator,
                value: spec.aggregator.apply(&column),
            });
        }
        summaries.push(AggregateSummary {
            key,
            count: rows.len(),
            rows,
            aggregates: values,
        });
    }

    log::debug!(
        "grouped {} records by {:?} into {} group(s)",
        dataset.len(),
        group_key,
        summaries.len()
    );
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::data::sample;

    fn employee_specs() -> Vec<AggregateSpec> {
        vec![AggregateSpec::mean("age"), AggregateSpec::mean("salary")]
    }

    #[test]
    fn groups_by_city_in_first_occurrence_order() {
        let ds = sample::employees();
        let groups = group_and_aggregate(&ds, Some("city"), &employee_specs()).unwrap();

        let labels: Vec<String> = groups.iter().map(AggregateSummary::label).collect();
        assert_eq!(labels, ["New York", "Los Angeles", "Chicago"]);
        assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), 10);

        let ny = &groups[0];
        assert_eq!(ny.count, 4);
        assert_eq!(ny.rows, [0, 3, 6, 9]);
        assert_eq!(ny.get("age", Aggregator::Mean), Some(28.5));
        assert_eq!(ny.get("salary", Aggregator::Mean), Some(57000.0));

        let chicago = &groups[2];
        assert_eq!(chicago.get("age", Aggregator::Mean), Some(113.0 / 3.0));
        assert_eq!(chicago.get("salary", Aggregator::Mean), Some(75000.0));
    }

    #[test]
    fn missing_key_is_one_total_group() {
        let ds = sample::employees();
        for key in [None, Some("")] {
            let groups = group_and_aggregate(&ds, key, &employee_specs()).unwrap();
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].label(), "Total");
            assert_eq!(groups[0].count, 10);
            assert_eq!(groups[0].get("age", Aggregator::Mean), Some(30.6));
        }
    }

    #[test]
    fn empty_dataset_yields_no_groups() {
        let ds = Dataset::with_columns(vec!["k".into(), "v".into()], Vec::new()).unwrap();
        assert!(group_and_aggregate(&ds, None, &[AggregateSpec::mean("v")]).unwrap().is_empty());
        assert!(group_and_aggregate(&ds, Some("k"), &[AggregateSpec::mean("v")]).unwrap().is_empty());

        let schemaless = Dataset::from_records(Vec::new()).unwrap();
        assert!(group_and_aggregate(&schemaless, None, &[AggregateSpec::mean("v")]).unwrap().is_empty());
        assert!(group_and_aggregate(&schemaless, Some("k"), &[AggregateSpec::mean("v")]).unwrap().is_empty());
    }

    #[test]
    fn other_aggregators() {
        let ds = sample::employees();
        let specs: Vec<AggregateSpec> = Aggregator::ALL
            .iter()
            .map(|&a| AggregateSpec::new("salary", a))
            .collect();
        let groups = group_and_aggregate(&ds, Some("city"), &specs).unwrap();
        let la = &groups[1];
        assert_eq!(la.get("salary", Aggregator::Sum), Some(160000.0));
        assert_eq!(la.get("salary", Aggregator::Min), Some(48000.0));
        assert_eq!(la.get("salary", Aggregator::Max), Some(60000.0));
    }

    #[test]
    fn key_equality_is_not_normalized() {
        let ds = Dataset::from_records(vec![
            Record::new().with("k", 1i64).with("v", 1i64),
            Record::new().with("k", 1.0).with("v", 2i64),
            Record::new().with("k", 1i64).with("v", 3i64),
        ])
        .unwrap();
        let groups = group_and_aggregate(&ds, Some("k"), &[AggregateSpec::mean("v")]).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].get("v", Aggregator::Mean), Some(2.0));
        assert_eq!(groups[1].rows, [1]);
    }

    #[test]
    fn unknown_and_non_numeric_fields() {
        let ds = sample::employees();
        assert_eq!(
            group_and_aggregate(&ds, Some("country"), &[]).unwrap_err(),
            InputError::UnknownField { field: "country".into() }
        );
        assert!(matches!(
            group_and_aggregate(&ds, Some("city"), &[AggregateSpec::mean("name")]).unwrap_err(),
            InputError::NonNumericField { .. }
        ));
    }

    #[test]
    fn spec_display() {
        assert_eq!(AggregateSpec::mean("age").to_string(), "mean(age)");
    }
}
