//! Vault facade: bound configuration plus anonymize/deanonymize entry points.

use crate::engine::{
    AnonymizerEngine, ConflictResolutionStrategy, DEFAULT_ENTITY, DeanonymizeEngine, EngineResult,
    OperatorConfig, OperatorResult, RecognizerResult,
};
use crate::error::AnonymizerResult;
use crate::operator::OperatorParams;
use crate::operators::{VAULT_DECRYPT, VAULT_ENCRYPT, VaultDecrypt, VaultEncrypt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Bound Vault connection configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault base address (e.g., "http://127.0.0.1:8200").
    pub vault_url: String,

    /// Name of the transit key both operators address.
    pub key: String,

    /// Optional Vault token. None means an anonymous or
    /// pre-authenticated client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_token: Option<String>,
}

impl VaultConfig {
    pub fn new(vault_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            vault_url: vault_url.into(),
            key: key.into(),
            vault_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.vault_token = Some(token.into());
        self
    }

    /// Operator parameters both Vault operators consume. The token entry is
    /// omitted entirely when unset.
    pub fn to_params(&self) -> OperatorParams {
        let mut params = OperatorParams::new();
        params.insert("vault_url".into(), self.vault_url.clone().into());
        params.insert("key".into(), self.key.clone().into());
        if let Some(token) = &self.vault_token {
            params.insert("vault_token".into(), token.clone().into());
        }
        params
    }
}

/// Facade binding one Vault configuration to both transform directions.
///
/// Immutable once constructed; each call builds a fresh engine, registers
/// the matching operator, and routes every entity to it through a
/// `DEFAULT` config entry. Validation is left to the operator's own
/// `validate`, which the engine runs before dispatch.
pub struct Vault {
    config: VaultConfig,
}

impl Vault {
    pub fn new(config: VaultConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Encrypts every detected span in `text` with the bound transit key.
    ///
    /// Returns the transformed text plus the per-span metadata needed to
    /// reverse it with [`Vault::deanonymize`].
    pub async fn anonymize(
        &self,
        text: &str,
        analyzer_results: Vec<RecognizerResult>,
        conflict_resolution: Option<ConflictResolutionStrategy>,
    ) -> AnonymizerResult<EngineResult> {
        let mut engine = AnonymizerEngine::new();
        engine.add_anonymizer(Arc::new(VaultEncrypt::new()))?;
        let operators = self.default_routed(VAULT_ENCRYPT);
        engine
            .anonymize(
                text,
                analyzer_results,
                &operators,
                conflict_resolution.unwrap_or_default(),
            )
            .await
    }

    /// Decrypts previously anonymized spans, restoring the original text.
    pub async fn deanonymize(
        &self,
        text: &str,
        anonymizer_result_items: Vec<OperatorResult>,
    ) -> AnonymizerResult<EngineResult> {
        let mut engine = DeanonymizeEngine::new();
        engine.add_deanonymizer(Arc::new(VaultDecrypt::new()))?;
        let operators = self.default_routed(VAULT_DECRYPT);
        engine
            .deanonymize(text, anonymizer_result_items, &operators)
            .await
    }

    fn default_routed(&self, operator_name: &str) -> HashMap<String, OperatorConfig> {
        HashMap::from([(
            DEFAULT_ENTITY.to_string(),
            OperatorConfig::new(operator_name, self.config.to_params()),
        )])
    }
}
