//! Vault-backed text anonymization operators.
//!
//! Two reversible operators — `vault_encrypt` and `vault_decrypt` — that
//! delegate cryptography to a Vault transit key, plus the engine surface
//! they register with:
//! - **`operator`**: the pluggable operator contract (`Operator`,
//!   `OperatorType`, `OperatorParams`)
//! - **`engine`**: name-keyed registration and per-span dispatch with
//!   `DEFAULT`-routed operator configs
//! - **`operators`**: the two Vault transit operators
//! - **`vault`**: the facade binding one configuration to both directions
//!
//! Operators are stateless: each call validates, makes one remote round
//! trip, and returns. Remote failures propagate untranslated.

pub mod engine;
pub mod error;
pub mod operator;
mod params;
pub mod operators;
pub mod vault;

pub use engine::{
    AnonymizerEngine, ConflictResolutionStrategy, DEFAULT_ENTITY, DeanonymizeEngine, EngineResult,
    OperatorConfig, OperatorResult, RecognizerResult,
};
pub use error::{AnonymizerError, AnonymizerResult};
pub use operator::{Operator, OperatorParams, OperatorType};
pub use operators::{VAULT_DECRYPT, VAULT_ENCRYPT, VaultDecrypt, VaultEncrypt};
pub use vault::{Vault, VaultConfig};
