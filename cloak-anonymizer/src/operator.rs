//! The pluggable operator contract.
//!
//! An operator is a named, reversible-or-forward text transform the engine
//! dispatches per detected span. Hosts must run `validate` before `operate`;
//! `validate` is side-effect-free and never performs I/O, so a rejected
//! configuration can never trigger a remote call.

use crate::error::AnonymizerResult;
use async_trait::async_trait;
use std::fmt;

/// Loosely typed operator parameters.
///
/// A JSON map rather than a struct so that "present but not a string" is
/// representable and can be rejected by `validate` with a precise message.
pub type OperatorParams = serde_json::Map<String, serde_json::Value>;

/// Direction of a text transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorType {
    /// Forward transform: sensitive text to obfuscated text.
    Anonymize,
    /// Reverse transform: obfuscated text back to the original.
    Deanonymize,
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorType::Anonymize => write!(f, "anonymize"),
            OperatorType::Deanonymize => write!(f, "deanonymize"),
        }
    }
}

/// A named text-transform unit registered with an engine.
///
/// Operators are pure functions of `(text, params)`: no state is carried
/// between calls, so they compose under any host span-resolution policy.
#[async_trait]
pub trait Operator: Send + Sync {
    /// Transforms a single text segment. Performs at most one remote round
    /// trip; no retries, no caching.
    async fn operate(&self, text: &str, params: &OperatorParams) -> AnonymizerResult<String>;

    /// Checks `params` deterministically, without side effects. Must be
    /// called by the host before `operate`; `operate` does not re-check.
    fn validate(&self, params: &OperatorParams) -> AnonymizerResult<()>;

    /// Registration name, used as the key in operator-config mappings.
    fn operator_name(&self) -> &str;

    fn operator_type(&self) -> OperatorType;
}

/// Returns a string-valued parameter, or `None` when absent or non-string.
pub(crate) fn str_param<'a>(params: &'a OperatorParams, name: &str) -> Option<&'a str> {
    params.get(name).and_then(serde_json::Value::as_str)
}
