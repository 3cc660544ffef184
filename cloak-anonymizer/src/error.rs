//! Anonymizer error types.

use crate::operator::OperatorType;
use cloak_transit::TransitError;
use thiserror::Error;

/// Result type for anonymizer operations.
pub type AnonymizerResult<T> = Result<T, AnonymizerError>;

/// Errors raised by operators and the engine surface.
///
/// Transit failures pass through untranslated — the remote service is
/// authoritative for service-side classification. Decode failures on the
/// decrypt path surface as the decode error itself.
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Parameter validation failure. The message names the offending field.
    #[error("{0}")]
    InvalidParam(String),

    #[error("transit error: {0}")]
    Transit(#[from] TransitError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decrypted payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("no operator configured for entity '{0}' and no DEFAULT entry")]
    MissingOperatorConfig(String),

    #[error("operator '{name}' is a {actual} operator, expected {expected}")]
    WrongOperatorType {
        name: String,
        expected: OperatorType,
        actual: OperatorType,
    },

    #[error("span {start}..{end} is out of bounds or not on a character boundary")]
    InvalidSpan { start: usize, end: usize },

    #[error("span {start}..{end} overlaps a previously applied span")]
    OverlappingSpans { start: usize, end: usize },
}
