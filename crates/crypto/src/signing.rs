//! Assertion Signing - reference signer for the risk oracle
//!
//! The ledger never signs anything; this is the signer-side counterpart of
//! [`crate::verify`], used by the oracle and by golden-byte tests:
//! - Validates the assertion the way the oracle's input model does
//! - Signs the canonical bytes with Ed25519 (deterministic for the same input)
//! - Keeps simple counters for observability
//!
//! # Security Model
//!
//! - Private key bytes are zeroized after the key is constructed
//! - Secrets are never logged; the key is referred to by its `key_id`

use crate::canonical::RiskAssertion;
use crate::verify::AssertionVerifier;
use ed25519_dalek::{Signer, SigningKey};
use sentinel_core::{AuthorityKey, SignatureBytes};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroize;

/// Highest risk score the oracle will sign.
pub const MAX_RISK_SCORE: u32 = 100;

/// A signed assertion in the shape the oracle returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAssertion {
    /// The data that was signed
    pub payload: RiskAssertion,
    /// Ed25519 signature over the canonical payload bytes (hex in JSON)
    pub signature: SignatureBytes,
    /// Public key of the signer (hex in JSON)
    pub oracle_pubkey: AuthorityKey,
}

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Cryptographic error: {reason}")]
    CryptoError { reason: String },
}

/// Metrics for observability.
#[derive(Debug, Default)]
pub struct SigningMetrics {
    pub signed_total: u64,
    pub rejected_total: u64,
}

/// Reference signer holding the authority's private key.
pub struct AssertionSigner {
    signing_key: SigningKey,
    public_key: AuthorityKey,
    metrics: SigningMetrics,
}

impl AssertionSigner {
    /// Creates a signer with a freshly generated key.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut secret_key_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret_key_bytes);

        let signing_key = SigningKey::from_bytes(&secret_key_bytes);
        secret_key_bytes.zeroize();

        Self::from_signing_key(signing_key)
    }

    /// Creates a signer from an existing 32-byte secret key.
    pub fn from_key(key_bytes: &[u8]) -> Result<Self, SigningError> {
        if key_bytes.len() != 32 {
            return Err(SigningError::CryptoError {
                reason: format!("Invalid key length: {} (expected 32)", key_bytes.len()),
            });
        }

        let mut key_array = [0u8; 32];
        key_array.copy_from_slice(key_bytes);
        let signing_key = SigningKey::from_bytes(&key_array);
        key_array.zeroize();

        Ok(Self::from_signing_key(signing_key))
    }

    /// Creates a signer from a hex-encoded secret key, as stored in `ORACLE_PRIVATE_KEY`.
    pub fn from_hex(encoded: &str) -> Result<Self, SigningError> {
        let mut bytes = hex::decode(encoded.trim()).map_err(|e| SigningError::CryptoError {
            reason: format!("Invalid key encoding: {}", e),
        })?;
        let signer = Self::from_key(&bytes);
        bytes.zeroize();
        signer
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = AuthorityKey::from_bytes(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            public_key,
            metrics: SigningMetrics::default(),
        }
    }

    /// The public key to register with the ledger.
    pub fn public_key(&self) -> AuthorityKey {
        self.public_key
    }

    pub fn key_id(&self) -> String {
        self.public_key.key_id()
    }

    /// A verifier bound to this signer's public key.
    pub fn verifier(&self) -> AssertionVerifier<crate::verify::Ed25519Verifier> {
        AssertionVerifier::ed25519(self.public_key)
    }

    /// Checks an assertion against the oracle's input rules.
    ///
    /// Scores must be 0-100 and wallets non-empty. Wallets that look like
    /// Stellar accounts (leading `G`) must be well-formed 56-character ids.
    pub fn validate(assertion: &RiskAssertion) -> Result<(), SigningError> {
        if assertion.risk_score > MAX_RISK_SCORE {
            return Err(SigningError::InvalidField {
                field: "risk_score".to_string(),
                reason: format!("{} is outside 0-{}", assertion.risk_score, MAX_RISK_SCORE),
            });
        }

        let wallet = &assertion.wallet;
        if wallet.as_str().is_empty() {
            return Err(SigningError::InvalidField {
                field: "wallet".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if wallet.as_str().starts_with('G') && !wallet.is_stellar_account() {
            return Err(SigningError::InvalidField {
                field: "wallet".to_string(),
                reason: "Stellar account ids are 56 characters of A-Z and 2-7".to_string(),
            });
        }

        Ok(())
    }

    /// Validates and signs an assertion.
    pub fn sign(&mut self, assertion: &RiskAssertion) -> Result<SignedAssertion, SigningError> {
        if let Err(e) = Self::validate(assertion) {
            self.metrics.rejected_total += 1;
            return Err(e);
        }

        let signature = self.sign_unchecked(assertion);
        self.metrics.signed_total += 1;

        debug!(
            key_id = %self.key_id(),
            wallet = %assertion.wallet,
            risk_score = assertion.risk_score,
            timestamp = assertion.timestamp,
            "Assertion signed"
        );

        Ok(SignedAssertion {
            payload: assertion.clone(),
            signature,
            oracle_pubkey: self.public_key,
        })
    }

    /// Signs the canonical bytes without input validation.
    ///
    /// Lets tests produce validly signed but out-of-range assertions.
    pub fn sign_unchecked(&self, assertion: &RiskAssertion) -> SignatureBytes {
        let signature = self.signing_key.sign(&assertion.to_canonical_bytes());
        SignatureBytes::from_bytes(signature.to_bytes())
    }

    pub fn metrics(&self) -> &SigningMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for AssertionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionSigner")
            .field("key_id", &self.key_id())
            .finish_non_exhaustive()
    }
}
