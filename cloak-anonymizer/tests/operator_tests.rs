mod support;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cloak_anonymizer::{AnonymizerError, Operator, OperatorParams, OperatorType};
use cloak_anonymizer::{VaultDecrypt, VaultEncrypt};
use pretty_assertions::assert_eq;
use support::StubConnector;

fn params(value: serde_json::Value) -> OperatorParams {
    value.as_object().expect("params must be an object").clone()
}

fn valid_params() -> OperatorParams {
    params(serde_json::json!({
        "vault_url": "http://127.0.0.1:8200",
        "key": "key"
    }))
}

// --- Validation (identical rule-set for both operators) ---

#[test]
fn encrypt_valid_params_raise_no_error() {
    assert!(VaultEncrypt::new().validate(&valid_params()).is_ok());
}

#[test]
fn decrypt_valid_params_raise_no_error() {
    assert!(VaultDecrypt::new().validate(&valid_params()).is_ok());
}

#[test]
fn encrypt_rejects_url_without_authority() {
    let p = params(serde_json::json!({
        "vault_url": "http:/127.0.0.1:8200",
        "key": "foobar"
    }));
    let err = VaultEncrypt::new().validate(&p).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid input, vault_url must be a valid URL."
    );
}

#[test]
fn decrypt_rejects_url_without_authority() {
    let p = params(serde_json::json!({
        "vault_url": "http:/127.0.0.1:8200",
        "key": "foobar"
    }));
    let err = VaultDecrypt::new().validate(&p).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid input, vault_url must be a valid URL."
    );
}

#[test]
fn encrypt_rejects_non_string_key() {
    let p = params(serde_json::json!({
        "vault_url": "http://127.0.0.1:8200",
        "key": 1
    }));
    let err = VaultEncrypt::new().validate(&p).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid input, key must be a valid encryption key name."
    );
}

#[test]
fn decrypt_rejects_non_string_key() {
    let p = params(serde_json::json!({
        "vault_url": "http://127.0.0.1:8200",
        "key": 1
    }));
    let err = VaultDecrypt::new().validate(&p).unwrap_err();
    assert!(matches!(err, AnonymizerError::InvalidParam(msg) if msg.contains("key")));
}

#[test]
fn validation_ignores_vault_token() {
    let p = params(serde_json::json!({
        "vault_url": "http://127.0.0.1:8200",
        "key": "foobar",
        "vault_token": 12345
    }));
    assert!(VaultEncrypt::new().validate(&p).is_ok());
    assert!(VaultDecrypt::new().validate(&p).is_ok());
}

// --- Identity ---

#[test]
fn operator_identities() {
    let encrypt = VaultEncrypt::new();
    assert_eq!(encrypt.operator_name(), "vault_encrypt");
    assert_eq!(encrypt.operator_type(), OperatorType::Anonymize);

    let decrypt = VaultDecrypt::new();
    assert_eq!(decrypt.operator_name(), "vault_decrypt");
    assert_eq!(decrypt.operator_type(), OperatorType::Deanonymize);
}

// --- Encrypt ---

#[tokio::test]
async fn encrypt_returns_ciphertext_and_connects_to_configured_url() {
    let connector = StubConnector::fixed("encrypted_text", "");
    let operator = VaultEncrypt::with_connector(Box::new(connector.clone()));

    let result = operator.operate("text", &valid_params()).await.unwrap();

    assert_eq!(result, "encrypted_text");
    let connections = connector.connections();
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].0, "http://127.0.0.1:8200");
    assert_eq!(connections[0].1, None);
}

#[tokio::test]
async fn encrypt_forwards_token_when_supplied() {
    let connector = StubConnector::fixed("encrypted_text", "");
    let operator = VaultEncrypt::with_connector(Box::new(connector.clone()));
    let p = params(serde_json::json!({
        "vault_url": "http://127.0.0.1:8200",
        "key": "key",
        "vault_token": "secret-123"
    }));

    operator.operate("text", &p).await.unwrap();

    assert_eq!(connector.connections()[0].1.as_deref(), Some("secret-123"));
}

// --- Decrypt ---

#[tokio::test]
async fn decrypt_returns_decoded_plaintext() {
    let connector = StubConnector::fixed("", &STANDARD.encode("text"));
    let operator = VaultDecrypt::with_connector(Box::new(connector.clone()));

    let result = operator
        .operate("encrypted_text", &valid_params())
        .await
        .unwrap();

    assert_eq!(result, "text");
    assert_eq!(connector.connections()[0].0, "http://127.0.0.1:8200");
}

#[tokio::test]
async fn decrypt_forwards_token_when_supplied() {
    let connector = StubConnector::fixed("", &STANDARD.encode("text"));
    let operator = VaultDecrypt::with_connector(Box::new(connector.clone()));
    let p = params(serde_json::json!({
        "vault_url": "http://127.0.0.1:8200",
        "key": "key",
        "vault_token": "secret-123"
    }));

    operator.operate("encrypted_text", &p).await.unwrap();

    assert_eq!(connector.connections()[0].1.as_deref(), Some("secret-123"));
}

#[tokio::test]
async fn decrypt_surfaces_invalid_base64_as_decode_error() {
    let connector = StubConnector::fixed("", "not base64!!!");
    let operator = VaultDecrypt::with_connector(Box::new(connector));

    let err = operator
        .operate("encrypted_text", &valid_params())
        .await
        .unwrap_err();
    assert!(matches!(err, AnonymizerError::Base64(_)));
}

#[tokio::test]
async fn decrypt_surfaces_invalid_utf8_as_decode_error() {
    let connector = StubConnector::fixed("", &STANDARD.encode([0xff, 0xfe]));
    let operator = VaultDecrypt::with_connector(Box::new(connector));

    let err = operator
        .operate("encrypted_text", &valid_params())
        .await
        .unwrap_err();
    assert!(matches!(err, AnonymizerError::Utf8(_)));
}

// --- Round-trip law ---

#[tokio::test]
async fn decrypt_inverts_encrypt_over_a_reversible_service() {
    let connector = StubConnector::echo();
    let encrypt = VaultEncrypt::with_connector(Box::new(connector.clone()));
    let decrypt = VaultDecrypt::with_connector(Box::new(connector));

    for text in ["text", "", "héllo wörld", "日本語のテキスト", "a+b/c=d"] {
        let ciphertext = encrypt.operate(text, &valid_params()).await.unwrap();
        let restored = decrypt.operate(&ciphertext, &valid_params()).await.unwrap();
        assert_eq!(restored, text);
    }
}
