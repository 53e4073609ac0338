//! Conversion error types.

use thiserror::Error;

/// Errors that abort the conversion of a Bugzilla export.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The XML document could not be parsed.
    #[error("Failed to parse Bugzilla XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A field required for conversion is absent.
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    /// A field had a different shape than expected (e.g. repeated scalar).
    #[error("Field '{field}' is not a {expected}")]
    UnexpectedShape {
        field: String,
        expected: &'static str,
    },

    /// A timestamp did not match `YYYY-MM-DD HH:MM:SS +HHMM`.
    #[error("Date '{value}' was not converted: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A numeric identifier could not be parsed.
    #[error("Field '{field}' is not a valid number: '{value}'")]
    InvalidId { field: String, value: String },
}
