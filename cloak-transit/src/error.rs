//! Transit client error types.

use thiserror::Error;

/// Result type for transit operations.
pub type TransitResult<T> = Result<T, TransitError>;

/// Errors surfaced by the Vault transit client.
///
/// These propagate to callers untranslated — the remote service is
/// authoritative for service-side failure classification.
#[derive(Debug, Error)]
pub enum TransitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vault returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected transit response: {0}")]
    Response(String),
}
