//! Summary engine for small in-memory datasets: filter records, group them
//! with aggregates and compute descriptive statistics.

pub mod data;
pub mod engine;

pub use data::error::InputError;
pub use data::filter::{filter, Comparison, Condition, Predicate};
pub use data::group::{group_and_aggregate, AggregateSpec, AggregateSummary, Aggregator};
pub use data::model::{Dataset, Record, Value};
pub use data::stats::{describe, DescriptiveStatistics, MedianRule};
pub use engine::{summarize, SummaryReport, SummaryRequest, Warning};
