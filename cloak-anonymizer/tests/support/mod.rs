//! Shared test stubs: an in-memory transit service behind the
//! `TransitConnector` seam, recording every connection it hands out.
#![allow(dead_code)]

use async_trait::async_trait;
use cloak_transit::{TransitClient, TransitConnector, TransitError, TransitResult};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum StubBehavior {
    /// Always answer with these canned responses.
    Fixed {
        ciphertext: String,
        plaintext_b64: String,
    },
    /// Reversible: encrypt wraps the base64 payload, decrypt unwraps it.
    Echo,
}

/// Connector stub. `connect` records the URL/token pair it was called with
/// and yields a client with the configured behavior.
#[derive(Clone)]
pub struct StubConnector {
    behavior: StubBehavior,
    connections: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl StubConnector {
    pub fn fixed(ciphertext: &str, plaintext_b64: &str) -> Self {
        Self {
            behavior: StubBehavior::Fixed {
                ciphertext: ciphertext.to_string(),
                plaintext_b64: plaintext_b64.to_string(),
            },
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self {
            behavior: StubBehavior::Echo,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every `(url, token)` pair `connect` has seen, in order.
    pub fn connections(&self) -> Vec<(String, Option<String>)> {
        self.connections.lock().unwrap().clone()
    }
}

impl TransitConnector for StubConnector {
    fn connect(&self, url: &str, token: Option<&str>) -> Box<dyn TransitClient> {
        self.connections
            .lock()
            .unwrap()
            .push((url.to_string(), token.map(str::to_owned)));
        Box::new(StubClient {
            behavior: self.behavior.clone(),
        })
    }
}

struct StubClient {
    behavior: StubBehavior,
}

#[async_trait]
impl TransitClient for StubClient {
    async fn encrypt_data(&self, _key_name: &str, plaintext_b64: &str) -> TransitResult<String> {
        match &self.behavior {
            StubBehavior::Fixed { ciphertext, .. } => Ok(ciphertext.clone()),
            StubBehavior::Echo => Ok(format!("stub:{plaintext_b64}")),
        }
    }

    async fn decrypt_data(&self, _key_name: &str, ciphertext: &str) -> TransitResult<String> {
        match &self.behavior {
            StubBehavior::Fixed { plaintext_b64, .. } => Ok(plaintext_b64.clone()),
            StubBehavior::Echo => ciphertext
                .strip_prefix("stub:")
                .map(str::to_owned)
                .ok_or_else(|| TransitError::Api {
                    status: 400,
                    message: "invalid ciphertext".to_string(),
                }),
        }
    }
}
