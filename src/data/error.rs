use thiserror::Error;

use super::model::Value;

/// Invalid input handed to the engine by its caller.
///
/// Every variant is local and recoverable: the caller decides how to
/// present it (the UI shows it as an "invalid filter" message).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("threshold for '{field}' is not a number: '{input}'")]
    InvalidThreshold { field: String, input: String },

    #[error("field '{field}' is not numeric in row {row} (found {value})")]
    NonNumericField {
        field: String,
        row: usize,
        value: Value,
    },

    #[error("row {} has fields [{}], expected [{}]", .row, .found.join(", "), .expected.join(", "))]
    SchemaMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl InputError {
    pub(crate) fn unknown_field(field: &str) -> Self {
        InputError::UnknownField {
            field: field.to_string(),
        }
    }
}
