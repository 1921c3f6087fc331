use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::InputError;

// ---------------------------------------------------------------------------
// Value – a single cell of a record
// ---------------------------------------------------------------------------

/// A dynamically-typed field value mirroring common Pandas dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet and use it as a group key --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            // total_cmp equality is bitwise equality, so hashing the bits agrees with Eq.
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Debug keeps the ".0" on whole floats so they stay floats when re-read.
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for numeric predicates and aggregates.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integers and finite floats.
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Integer(_) => true,
            Value::Float(v) => v.is_finite(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single row: field name → value, in the order the fields were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Replaces the value if the field already exists.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Dataset – an immutable snapshot of records sharing one schema
// ---------------------------------------------------------------------------

/// Records plus pre-computed column indices.
///
/// Operations never mutate a `Dataset`; filtering produces a new one that
/// keeps the schema even when no record survives.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All records (rows).
    records: Vec<Record>,
    /// Field names, in the order of the first record.
    columns: Vec<String>,
    /// For each field the sorted set of distinct values.
    unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Dataset {
    /// Build a dataset, checking that every record has the same field set.
    pub fn from_records(records: Vec<Record>) -> Result<Self, InputError> {
        let columns: Vec<String> = records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();
        Self::with_columns(columns, records)
    }

    /// Build a dataset with an explicit schema (useful for empty datasets).
    pub fn with_columns(columns: Vec<String>, records: Vec<Record>) -> Result<Self, InputError> {
        let expected: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
        for (row, record) in records.iter().enumerate() {
            let found: BTreeSet<&str> = record.field_names().collect();
            if found != expected || record.len() != columns.len() {
                return Err(InputError::SchemaMismatch {
                    row,
                    expected: columns.clone(),
                    found: record.field_names().map(str::to_string).collect(),
                });
            }
        }
        Ok(Self::build(columns, records))
    }

    fn build(columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> =
            columns.iter().map(|c| (c.clone(), BTreeSet::new())).collect();

        for record in &records {
            for (col, val) in record.iter() {
                if let Some(set) = unique_values.get_mut(col) {
                    set.insert(val.clone());
                }
            }
        }
        Dataset {
            records,
            columns,
            unique_values,
        }
    }

    /// New dataset holding the records at `indices`, same schema.
    pub(crate) fn subset(&self, indices: &[usize]) -> Self {
        let records = indices.iter().map(|&i| self.records[i].clone()).collect();
        Self::build(self.columns.clone(), records)
    }

    /// Copy of this dataset with one more record appended.
    ///
    /// An empty, schema-less dataset adopts the record's fields as its schema.
    pub fn appended(&self, record: Record) -> Result<Self, InputError> {
        let columns = if self.columns.is_empty() && self.records.is_empty() {
            record.field_names().map(str::to_string).collect()
        } else {
            self.columns.clone()
        };
        let mut records = self.records.clone();
        records.push(record);
        Self::with_columns(columns, records)
    }

    /// Copy of this dataset without the record at `index` (no-op when out of range).
    pub fn without(&self, index: usize) -> Self {
        let keep: Vec<usize> = (0..self.len()).filter(|&i| i != index).collect();
        self.subset(&keep)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn unique_values(&self, field: &str) -> Option<&BTreeSet<Value>> {
        self.unique_values.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c == field)
    }

    /// A dataset built from no records at all has no schema to check against,
    /// so every field is accepted there.
    pub(crate) fn require_field(&self, field: &str) -> Result<(), InputError> {
        if self.has_field(field) || (self.columns.is_empty() && self.records.is_empty()) {
            Ok(())
        } else {
            Err(InputError::unknown_field(field))
        }
    }

    /// Finite numeric value of `field` in row `row`.
    ///
    /// NaN and infinities are rejected like text so they never leak into a mean.
    pub(crate) fn numeric(&self, row: usize, field: &str) -> Result<f64, InputError> {
        let value = self.records[row]
            .get(field)
            .ok_or_else(|| InputError::unknown_field(field))?;
        value.as_f64().filter(|v| v.is_finite()).ok_or_else(|| InputError::NonNumericField {
            field: field.to_string(),
            row,
            value: value.clone(),
        })
    }

    /// Fields whose values are all numeric (and that have at least one value).
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| {
                !self.records.is_empty()
                    && self
                        .records
                        .iter()
                        .all(|r| r.get(c).is_some_and(Value::is_numeric))
            })
            .cloned()
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
