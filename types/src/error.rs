//! Validation errors raised at the wire boundary.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("transaction update payload must be a JSON object")]
    NotAnObject,

    #[error("transaction update is missing field `{0}`")]
    MissingField(&'static str),

    #[error("transaction update field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
