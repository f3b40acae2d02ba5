use thiserror::Error;

/// Errors produced while building or inspecting documents.
///
/// `Malformed`, `TooDeep` and `NonFiniteNumber` all mean the input cannot be
/// represented as a [`Document`](crate::Document); they are raised before any
/// comparison starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("document nesting exceeds {max_depth} levels")]
    TooDeep { max_depth: usize },

    #[error("number is not finite")]
    NonFiniteNumber,

    #[error("snapshot is missing string field `{0}`")]
    MissingField(String),
}
