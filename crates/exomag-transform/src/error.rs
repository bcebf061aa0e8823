use thiserror::Error;

/// Failures raised by the transformation engine.
///
/// The engine performs no local recovery: every error aborts the run. The
/// first three variants are mapping-table defects (the table promised
/// something the data or the step shapes do not provide); the rest are
/// malformed source data inside a step that assumes well-formedness.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("mapping for \"{destination}\" references field \"{field}\" absent from the record")]
    MissingField { destination: String, field: String },

    #[error("{step} step expected a {expected} value, got {found}")]
    Shape {
        step: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("mapping for \"{destination}\" produced a non-scalar {shape} value")]
    NonScalar {
        destination: String,
        shape: &'static str,
    },

    #[error("template placeholder {{{placeholder}}} not present in sub-record")]
    Template { placeholder: String },

    #[error("cannot parse \"{value}\" as an ISO calendar date")]
    Date { value: String },

    #[error("invalid pattern in mapping step: {0}")]
    Pattern(#[from] regex::Error),
}
