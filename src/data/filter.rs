use std::collections::BTreeSet;
use std::fmt;

use super::error::InputError;
use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Predicates: one boolean test on one field
// ---------------------------------------------------------------------------

/// Numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Ge,
        Comparison::Gt,
        Comparison::Le,
        Comparison::Lt,
        Comparison::Eq,
        Comparison::Ne,
    ];

    /// `value <op> threshold`. Any comparison involving NaN is false, except `Ne`.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Lt => value < threshold,
            Comparison::Le => value <= threshold,
            Comparison::Gt => value > threshold,
            Comparison::Ge => value >= threshold,
            Comparison::Eq => value == threshold,
            Comparison::Ne => value != threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What a predicate tests a field's value against.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Numeric comparison; the field must hold numbers.
    Compare { op: Comparison, threshold: f64 },
    /// Exact equality on the raw value (`Integer(1)` does not equal `Float(1.0)`).
    Equals(Value),
    /// Value is one of the selected set. An empty set selects nothing.
    OneOf(BTreeSet<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub condition: Condition,
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: Comparison, threshold: f64) -> Self {
        Predicate {
            field: field.into(),
            condition: Condition::Compare { op, threshold },
        }
    }

    /// `field >= threshold`, the "minimum" filter.
    pub fn at_least(field: impl Into<String>, threshold: f64) -> Self {
        Self::compare(field, Comparison::Ge, threshold)
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate {
            field: field.into(),
            condition: Condition::Equals(value.into()),
        }
    }

    pub fn one_of(field: impl Into<String>, values: BTreeSet<Value>) -> Self {
        Predicate {
            field: field.into(),
            condition: Condition::OneOf(values),
        }
    }

    /// Build a numeric comparison from user-typed threshold text.
    ///
    /// Text that is not a finite number is rejected instead of being coerced
    /// to NaN (which would silently exclude every record).
    pub fn parse(field: impl Into<String>, op: Comparison, input: &str) -> Result<Self, InputError> {
        let field = field.into();
        match input.trim().parse::<f64>() {
            Ok(threshold) if threshold.is_finite() => Ok(Self::compare(field, op, threshold)),
            _ => Err(InputError::InvalidThreshold {
                field,
                input: input.to_string(),
            }),
        }
    }

    fn matches(&self, dataset: &Dataset, row: usize) -> Result<bool, InputError> {
        match &self.condition {
            Condition::Compare { op, threshold } => {
                let value = dataset.numeric(row, &self.field)?;
                Ok(op.holds(value, *threshold))
            }
            Condition::Equals(expected) => Ok(dataset.records()[row].get(&self.field) == Some(expected)),
            Condition::OneOf(selected) => Ok(dataset.records()[row]
                .get(&self.field)
                .is_some_and(|v| selected.contains(v))),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.condition {
            Condition::Compare { op, threshold } => write!(f, "{} {op} {threshold}", self.field),
            Condition::Equals(v) => write!(f, "{} == {v}", self.field),
            Condition::OneOf(set) => {
                let items: Vec<String> = set.iter().map(Value::to_string).collect();
                write!(f, "{} in [{}]", self.field, items.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass all predicates (logical AND), in order.
///
/// Every predicate is evaluated on every record so that a type error is
/// reported regardless of which earlier predicate already rejected the row.
pub fn filtered_indices(dataset: &Dataset, predicates: &[Predicate]) -> Result<Vec<usize>, InputError> {
    for p in predicates {
        dataset.require_field(&p.field)?;
        if let Condition::Compare { threshold, .. } = p.condition {
            if !threshold.is_finite() {
                return Err(InputError::InvalidThreshold {
                    field: p.field.clone(),
                    input: threshold.to_string(),
                });
            }
        }
    }

    let mut kept = Vec::with_capacity(dataset.len());
    for row in 0..dataset.len() {
        let mut pass = true;
        for p in predicates {
            pass &= p.matches(dataset, row)?;
        }
        if pass {
            kept.push(row);
        }
    }
    log::trace!(
        "filter: {} of {} records pass {} predicate(s)",
        kept.len(),
        dataset.len(),
        predicates.len()
    );
    Ok(kept)
}

/// Return a new dataset with the records that pass all predicates.
///
/// No predicates → a copy of the input.
pub fn filter(dataset: &Dataset, predicates: &[Predicate]) -> Result<Dataset, InputError> {
    if predicates.is_empty() {
        return Ok(dataset.clone());
    }
    let indices = filtered_indices(dataset, predicates)?;
    Ok(dataset.subset(&indices))
}
