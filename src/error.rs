use thiserror::Error;

/// Request-level failures raised while compiling a column.
///
/// Bad *data* never surfaces here: a cell that cannot be coerced becomes
/// SQL `NULL` inside the generated expression. These variants only describe
/// bad requests or bad configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoerceError {
    #[error("coercion not implemented for column type '{datatype}'")]
    NotImplemented { datatype: String },
    #[error("unknown date format '{id}' (available: {available})")]
    UnknownDateFormat { id: String, available: String },
    #[error("invalid limit {limit} for column type '{datatype}'")]
    InvalidLimit { datatype: String, limit: u32 },
    #[error("invalid recognizer pattern '{pattern}' for format '{token}': {reason}")]
    InvalidPattern {
        token: String,
        pattern: String,
        reason: String,
    },
    #[error("format sequence '{0}' must contain at least one entry")]
    EmptyFormatSequence(String),
    #[error("format catalog error: {0}")]
    Catalog(String),
}

pub type Result<T, E = CoerceError> = std::result::Result<T, E>;
