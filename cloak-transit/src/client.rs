//! HTTP client for Vault's transit secrets engine.
//!
//! Speaks the two transit endpoints this workspace needs — encrypt and
//! decrypt against a named key — and nothing else. Key lifecycle on the
//! Vault server is out of scope.

use crate::error::{TransitError, TransitResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// A client for Vault's transit encryption-as-a-service.
///
/// Both operations treat their payloads as opaque strings: ciphertext is
/// returned verbatim and never inspected, and decrypt returns the base64
/// plaintext payload exactly as Vault produced it.
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Encrypts a base64-encoded plaintext with the named transit key.
    async fn encrypt_data(&self, key_name: &str, plaintext_b64: &str) -> TransitResult<String>;

    /// Decrypts ciphertext with the named transit key, returning the
    /// base64-encoded plaintext.
    async fn decrypt_data(&self, key_name: &str, ciphertext: &str) -> TransitResult<String>;
}

/// Builds a transit client for a given Vault address.
///
/// Callers construct a fresh client per operation; this seam is what lets
/// tests observe the exact URL and token a caller connected with.
pub trait TransitConnector: Send + Sync {
    fn connect(&self, url: &str, token: Option<&str>) -> Box<dyn TransitClient>;
}

/// Production connector: yields a [`VaultTransitClient`] over HTTP.
#[derive(Clone, Debug, Default)]
pub struct HttpTransitConnector;

impl TransitConnector for HttpTransitConnector {
    fn connect(&self, url: &str, token: Option<&str>) -> Box<dyn TransitClient> {
        Box::new(VaultTransitClient::new(url, token.map(str::to_owned)))
    }
}

/// reqwest-backed transit client.
pub struct VaultTransitClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct VaultResponse<T> {
    data: T,
}

#[derive(Deserialize)]
struct EncryptData {
    ciphertext: String,
}

#[derive(Deserialize)]
struct DecryptData {
    plaintext: String,
}

/// Vault error bodies carry `{"errors": [...]}` alongside a non-2xx status.
#[derive(Deserialize)]
struct VaultErrors {
    #[serde(default)]
    errors: Vec<String>,
}

impl VaultTransitClient {
    /// Creates a client against a Vault base address, with an optional
    /// token. No token means an anonymous (or pre-authenticated) client.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Address this client was constructed against (normalized, no
    /// trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_transit<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> TransitResult<T> {
        let url = format!("{}/v1/transit/{path}", self.base_url);
        debug!("POST {url}");

        let mut req = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            req = req.header("X-Vault-Token", token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<VaultErrors>()
                .await
                .map(|e| e.errors.join("; "))
                .unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: VaultResponse<T> = resp
            .json()
            .await
            .map_err(|e| TransitError::Response(e.to_string()))?;
        Ok(parsed.data)
    }
}

#[async_trait]
impl TransitClient for VaultTransitClient {
    async fn encrypt_data(&self, key_name: &str, plaintext_b64: &str) -> TransitResult<String> {
        let data: EncryptData = self
            .post_transit(
                &format!("encrypt/{key_name}"),
                serde_json::json!({ "plaintext": plaintext_b64 }),
            )
            .await?;
        Ok(data.ciphertext)
    }

    async fn decrypt_data(&self, key_name: &str, ciphertext: &str) -> TransitResult<String> {
        let data: DecryptData = self
            .post_transit(
                &format!("decrypt/{key_name}"),
                serde_json::json!({ "ciphertext": ciphertext }),
            )
            .await?;
        Ok(data.plaintext)
    }
}
