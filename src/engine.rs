//! One-call entry point: filter, then group and describe the filtered rows.

use serde::Serialize;

use crate::data::error::InputError;
use crate::data::filter::{filter, Predicate};
use crate::data::group::{group_and_aggregate, AggregateSpec, AggregateSummary};
use crate::data::model::Dataset;
use crate::data::stats::{describe_with, DescriptiveStatistics, MedianRule};

/// Non-fatal conditions attached to a [`SummaryReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// No record passed the filters; statistics are the all-zero neutral value.
    EmptyDataset,
}

/// Everything the caller selected, as plain data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryRequest {
    pub predicates: Vec<Predicate>,
    pub group_key: Option<String>,
    pub aggregates: Vec<AggregateSpec>,
    pub stats_fields: Vec<String>,
    pub median_rule: MedianRule,
}

impl SummaryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn group_by(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    pub fn aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregates.push(spec);
        self
    }

    pub fn describe(mut self, field: impl Into<String>) -> Self {
        self.stats_fields.push(field.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub filtered: Dataset,
    pub groups: Vec<AggregateSummary>,
    /// (field, statistics) in request order.
    pub statistics: Vec<(String, DescriptiveStatistics)>,
    pub warnings: Vec<Warning>,
}

impl SummaryReport {
    pub fn statistics_for(&self, field: &str) -> Option<&DescriptiveStatistics> {
        self.statistics
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, s)| s)
    }
}

/// Run `request` against `dataset`. Groups and statistics cover the filtered rows.
pub fn summarize(dataset: &Dataset, request: &SummaryRequest) -> Result<SummaryReport, InputError> {
    let filtered = filter(dataset, &request.predicates)?;
    let groups = group_and_aggregate(&filtered, request.group_key.as_deref(), &request.aggregates)?;

    let mut statistics = Vec::with_capacity(request.stats_fields.len());
    for field in &request.stats_fields {
        statistics.push((field.clone(), describe_with(&filtered, field, request.median_rule)?));
    }

    let mut warnings = Vec::new();
    if filtered.is_empty() {
        warnings.push(Warning::EmptyDataset);
    }

    log::debug!(
        "summary: {}/{} records, {} group(s), {} statistic(s)",
        filtered.len(),
        dataset.len(),
        groups.len(),
        statistics.len()
    );
    Ok(SummaryReport {
        filtered,
        groups,
        statistics,
        warnings,
    })
}
