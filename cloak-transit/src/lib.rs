//! Vault transit encryption client.
//!
//! Thin async client for HashiCorp Vault's transit secrets engine,
//! covering exactly the encrypt/decrypt pair the cloak operators need.
//! The [`TransitClient`] trait is the seam test suites stub; the
//! [`TransitConnector`] trait is the per-call construction seam.

pub mod client;
pub mod error;

pub use client::{HttpTransitConnector, TransitClient, TransitConnector, VaultTransitClient};
pub use error::{TransitError, TransitResult};
