use dtgen_ir::ValueType;

/// A generator could not be built from the declared constraints.
///
/// This is a configuration problem of one element; it never aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("minimum {min} is greater than maximum {max}")]
    InvertedRange { min: String, max: String },

    #[error("{bound} {value} is outside the representable range [{absolute_min}, {absolute_max}]")]
    OutOfDomain {
        bound: &'static str,
        value: String,
        absolute_min: String,
        absolute_max: String,
    },

    #[error("{0} bound is not a number")]
    NotANumber(&'static str),

    #[error("delta must be positive, got {0}")]
    NonPositiveDelta(f64),

    #[error("declared {field} is not a {expected} value")]
    TypeMismatch {
        field: &'static str,
        expected: ValueType,
    },

    #[error("invalid format expression: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A candidate query failed. Never cached; the next request retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query '{query}' failed: {message}")]
    Failed { query: String, message: String },

    #[error("no data source configured for query '{0}'")]
    NoSource(String),
}
