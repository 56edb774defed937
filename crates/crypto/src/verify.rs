//! Signature verification against the registered authority key.
//!
//! The host's asymmetric-signature primitive is modelled as the
//! [`SignatureVerifier`] trait so ledger logic can run against a fake in tests.
//! [`Ed25519Verifier`] is the production implementation.

use crate::canonical::RiskAssertion;
use ed25519_dalek::{Signature, VerifyingKey};
use sentinel_core::{AuthorityKey, SignatureBytes};
use tracing::debug;

/// Host capability: verify `signature` over `message` with a 32-byte public key.
pub trait SignatureVerifier {
    fn verify(&self, key: &AuthorityKey, message: &[u8], signature: &SignatureBytes) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, key: &AuthorityKey, message: &[u8], signature: &SignatureBytes) -> bool {
        (**self).verify(key, message, signature)
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for Box<V> {
    fn verify(&self, key: &AuthorityKey, message: &[u8], signature: &SignatureBytes) -> bool {
        (**self).verify(key, message, signature)
    }
}

/// Strict Ed25519 verification (RFC 8032 with small-order and malleability checks).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, key: &AuthorityKey, message: &[u8], signature: &SignatureBytes) -> bool {
        let verifying_key = match VerifyingKey::from_bytes(key.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                debug!(error = %e, "Authority key is not a valid Ed25519 point");
                return false;
            }
        };

        let signature = Signature::from_bytes(signature.as_bytes());
        verifying_key.verify_strict(message, &signature).is_ok()
    }
}

/// Canonicalize `assertion` and check `signature` over it.
///
/// Only the assertion's own fields enter the message; verification-time
/// context such as the ledger clock never does.
pub fn verify_assertion<V: SignatureVerifier + ?Sized>(
    verifier: &V,
    key: &AuthorityKey,
    assertion: &RiskAssertion,
    signature: &SignatureBytes,
) -> bool {
    let message = assertion.to_canonical_bytes();
    verifier.verify(key, &message, signature)
}

/// A verifier bound to one authority key.
#[derive(Debug, Clone)]
pub struct AssertionVerifier<V> {
    key: AuthorityKey,
    primitive: V,
}

impl<V: SignatureVerifier> AssertionVerifier<V> {
    pub fn new(key: AuthorityKey, primitive: V) -> Self {
        Self { key, primitive }
    }

    pub fn key(&self) -> &AuthorityKey {
        &self.key
    }

    pub fn verify(&self, assertion: &RiskAssertion, signature: &SignatureBytes) -> bool {
        verify_assertion(&self.primitive, &self.key, assertion, signature)
    }
}

impl AssertionVerifier<Ed25519Verifier> {
    pub fn ed25519(key: AuthorityKey) -> Self {
        Self::new(key, Ed25519Verifier)
    }
}
