//! Shared transit parameter validation.
//!
//! Both Vault operators address the same remote key, so whatever
//! configuration validates for encryption must validate for decryption.
//! That symmetry is kept by construction: one helper, used by both.

use crate::error::{AnonymizerError, AnonymizerResult};
use crate::operator::{OperatorParams, str_param};
use url::Url;

/// Validates the `vault_url` and `key` parameters.
///
/// `vault_url` must be a string parsing as an absolute URL with a scheme
/// and an explicit authority. WHATWG parsing alone would repair
/// `http:/host:8200` to `http://host:8200`, so the `://` separator is
/// required up front. `key` must be a non-empty string naming a transit
/// key. `vault_token` is never validated; absence is legal.
pub(crate) fn validate_transit_params(params: &OperatorParams) -> AnonymizerResult<()> {
    match str_param(params, "vault_url") {
        Some(raw) => {
            let valid = raw.contains("://")
                && Url::parse(raw).map(|url| url.has_host()).unwrap_or(false);
            if !valid {
                return Err(AnonymizerError::InvalidParam(
                    "Invalid input, vault_url must be a valid URL.".to_string(),
                ));
            }
        }
        None => {
            return Err(AnonymizerError::InvalidParam(
                "Invalid input, vault_url must be a string.".to_string(),
            ));
        }
    }

    match str_param(params, "key") {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(AnonymizerError::InvalidParam(
            "Invalid input, key must be a valid encryption key name.".to_string(),
        )),
    }
}
