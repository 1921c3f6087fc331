use std::collections::HashMap;

use serde::Serialize;

use super::error::InputError;
use super::model::Dataset;

/// count / mean / min / max / median / mode over one numeric field.
///
/// An empty input produces all zeros; [`is_degenerate`](Self::is_degenerate)
/// tells that apart from a legitimate all-zero dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DescriptiveStatistics {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub mode: f64,
}

impl DescriptiveStatistics {
    pub fn is_degenerate(&self) -> bool {
        self.count == 0
    }
}

/// How the median picks its value for an even number of observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MedianRule {
    /// Element at `floor(n / 2)` of the ascending sort: the upper-middle one
    /// for even `n`. This is what the lab has always displayed.
    #[default]
    UpperMiddle,
    /// Average of the two middle elements for even `n`.
    Midpoint,
}

/// Median of `values`, `None` when empty.
pub fn median(values: &[f64], rule: MedianRule) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(match rule {
        MedianRule::Midpoint if sorted.len() % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        _ => sorted[mid],
    })
}

/// Most frequent value, `None` when empty.
///
/// On a tie the first value to reach the highest count wins; a later value
/// reaching the same count does not displace it.
pub fn mode(values: &[f64]) -> Option<f64> {
    // -0.0 and 0.0 count as the same observation.
    fn key(v: f64) -> u64 {
        if v == 0.0 {
            0.0f64.to_bits()
        } else {
            v.to_bits()
        }
    }

    let mut frequency: HashMap<u64, usize> = HashMap::new();
    let mut best: Option<(f64, usize)> = None;
    for &v in values {
        let n = frequency.entry(key(v)).or_insert(0);
        *n += 1;
        match best {
            Some((_, top)) if *n <= top => {}
            _ => best = Some((v, *n)),
        }
    }
    best.map(|(v, _)| v)
}

pub fn describe_values(values: &[f64]) -> DescriptiveStatistics {
    describe_values_with(values, MedianRule::default())
}

pub fn describe_values_with(values: &[f64], rule: MedianRule) -> DescriptiveStatistics {
    if values.is_empty() {
        return DescriptiveStatistics::default();
    }
    let sum: f64 = values.iter().sum();
    DescriptiveStatistics {
        count: values.len(),
        mean: sum / values.len() as f64,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        median: median(values, rule).unwrap_or_default(),
        mode: mode(values).unwrap_or_default(),
    }
}

/// Descriptive statistics of the numeric `field` across `dataset`.
pub fn describe(dataset: &Dataset, field: &str) -> Result<DescriptiveStatistics, InputError> {
    describe_with(dataset, field, MedianRule::default())
}

pub fn describe_with(
    dataset: &Dataset,
    field: &str,
    rule: MedianRule,
) -> Result<DescriptiveStatistics, InputError> {
    dataset.require_field(field)?;
    let values = (0..dataset.len())
        .map(|row| dataset.numeric(row, field))
        .collect::<Result<Vec<f64>, _>>()?;
    if values.is_empty() {
        log::warn!("describe('{field}') on an empty dataset, returning zeros");
    }
    Ok(describe_values_with(&values, rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::data::sample;

    #[test]
    fn sandbox_sample() {
        let stats = describe(&sample::sandbox_points(), "value").unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 11.25);
        assert_eq!(stats.min, 8.0);
        assert_eq!(stats.max, 15.0);
        // [8, 10, 12, 15][2], not the conventional 11.
        assert_eq!(stats.median, 12.0);
        assert_eq!(stats.mode, 10.0);
        assert!(!stats.is_degenerate());
    }

    #[test]
    fn midpoint_median_is_opt_in() {
        let values = [10.0, 15.0, 8.0, 12.0];
        assert_eq!(median(&values, MedianRule::Midpoint), Some(11.0));
        assert_eq!(median(&[3.0, 1.0, 2.0], MedianRule::Midpoint), Some(2.0));
        assert_eq!(describe_values_with(&values, MedianRule::Midpoint).median, 11.0);
    }

    #[test]
    fn empty_is_all_zero_and_degenerate() {
        let stats = describe_values(&[]);
        assert_eq!(stats, DescriptiveStatistics::default());
        assert_eq!((stats.count, stats.mean, stats.min, stats.max), (0, 0.0, 0.0, 0.0));
        assert!(stats.is_degenerate());

        let ds = Dataset::with_columns(vec!["v".into()], Vec::new()).unwrap();
        assert!(describe(&ds, "v").unwrap().is_degenerate());

        let schemaless = Dataset::from_records(Vec::new()).unwrap();
        let stats = describe(&schemaless, "v").unwrap();
        assert_eq!(stats, DescriptiveStatistics::default());
        assert!(stats.is_degenerate());
    }

    #[test]
    fn nan_is_reported_not_averaged() {
        let ds = Dataset::from_records(vec![
            Record::new().with("v", 1.0),
            Record::new().with("v", f64::NAN),
        ])
        .unwrap();
        assert!(matches!(
            describe(&ds, "v"),
            Err(InputError::NonNumericField { row: 1, .. })
        ));
    }

    #[test]
    fn mode_tie_goes_to_first_to_reach_max() {
        assert_eq!(mode(&[10.0, 10.0, 15.0, 15.0]), Some(10.0));
        assert_eq!(mode(&[15.0, 10.0, 10.0, 15.0]), Some(10.0));
        assert_eq!(mode(&[1.0, 2.0, 3.0]), Some(1.0));
        assert_eq!(mode(&[1.0, 2.0, 2.0]), Some(2.0));
        assert_eq!(mode(&[0.0, -0.0, 5.0]), Some(0.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn employee_age_and_salary() {
        let ds = sample::employees();
        let age = describe(&ds, "age").unwrap();
        assert_eq!(age.count, 10);
        assert_eq!(age.mean, 30.6);
        assert_eq!((age.min, age.max), (22.0, 40.0));
        let salary = describe(&ds, "salary").unwrap();
        assert_eq!((salary.min, salary.max), (48000.0, 80000.0));
        assert_eq!(salary.mean, 61300.0);
    }

    #[test]
    fn field_errors() {
        let ds = sample::employees();
        assert_eq!(
            describe(&ds, "height").unwrap_err(),
            InputError::UnknownField { field: "height".into() }
        );
        assert!(matches!(describe(&ds, "city"), Err(InputError::NonNumericField { .. })));

        let mixed = Dataset::from_records(vec![
            Record::new().with("v", 1i64),
            Record::new().with("v", 2.5),
        ])
        .unwrap();
        assert_eq!(describe(&mixed, "v").unwrap().mean, 1.75);
    }
}
