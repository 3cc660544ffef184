//! The Vault transit operators.
//!
//! `VaultEncrypt` and `VaultDecrypt` delegate the actual cryptography to a
//! remote Vault transit key; locally they only base64 the payload and make
//! exactly one round trip per call. Ciphertext is opaque: produced by
//! encrypt, round-tripped through decrypt, never inspected.
//!
//! Both operators build a fresh transit client per call from the supplied
//! parameters, through a [`TransitConnector`] that tests can replace with a
//! stub.

use crate::error::AnonymizerResult;
use crate::operator::{Operator, OperatorParams, OperatorType, str_param};
use crate::params::validate_transit_params;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cloak_transit::{HttpTransitConnector, TransitConnector};
use tracing::debug;

/// Registration name of [`VaultEncrypt`].
pub const VAULT_ENCRYPT: &str = "vault_encrypt";

/// Registration name of [`VaultDecrypt`].
pub const VAULT_DECRYPT: &str = "vault_decrypt";

fn connection<'a>(params: &'a OperatorParams) -> (&'a str, &'a str, Option<&'a str>) {
    (
        str_param(params, "vault_url").unwrap_or_default(),
        str_param(params, "key").unwrap_or_default(),
        str_param(params, "vault_token"),
    )
}

/// Anonymizing operator: encrypts each span with a Vault transit key.
pub struct VaultEncrypt {
    connector: Box<dyn TransitConnector>,
}

impl VaultEncrypt {
    pub fn new() -> Self {
        Self::with_connector(Box::new(HttpTransitConnector))
    }

    /// Uses a custom connector; the seam for stubbing the remote service.
    pub fn with_connector(connector: Box<dyn TransitConnector>) -> Self {
        Self { connector }
    }
}

impl Default for VaultEncrypt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operator for VaultEncrypt {
    async fn operate(&self, text: &str, params: &OperatorParams) -> AnonymizerResult<String> {
        let (vault_url, key, token) = connection(params);
        let client = self.connector.connect(vault_url, token);
        debug!(key, "encrypting via transit");
        let ciphertext = client
            .encrypt_data(key, &STANDARD.encode(text.as_bytes()))
            .await?;
        Ok(ciphertext)
    }

    fn validate(&self, params: &OperatorParams) -> AnonymizerResult<()> {
        validate_transit_params(params)
    }

    fn operator_name(&self) -> &str {
        VAULT_ENCRYPT
    }

    fn operator_type(&self) -> OperatorType {
        OperatorType::Anonymize
    }
}

/// Deanonymizing operator: decrypts ciphertext spans back to the original
/// text with the same Vault transit key.
pub struct VaultDecrypt {
    connector: Box<dyn TransitConnector>,
}

impl VaultDecrypt {
    pub fn new() -> Self {
        Self::with_connector(Box::new(HttpTransitConnector))
    }

    /// Uses a custom connector; the seam for stubbing the remote service.
    pub fn with_connector(connector: Box<dyn TransitConnector>) -> Self {
        Self { connector }
    }
}

impl Default for VaultDecrypt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operator for VaultDecrypt {
    async fn operate(&self, text: &str, params: &OperatorParams) -> AnonymizerResult<String> {
        let (vault_url, key, token) = connection(params);
        let client = self.connector.connect(vault_url, token);
        debug!(key, "decrypting via transit");
        let payload = client.decrypt_data(key, text).await?;
        let bytes = STANDARD.decode(payload.as_bytes())?;
        Ok(String::from_utf8(bytes)?)
    }

    fn validate(&self, params: &OperatorParams) -> AnonymizerResult<()> {
        validate_transit_params(params)
    }

    fn operator_name(&self) -> &str {
        VAULT_DECRYPT
    }

    fn operator_type(&self) -> OperatorType {
        OperatorType::Deanonymize
    }
}
