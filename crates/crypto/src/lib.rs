//! Cryptographic primitives for the Sentinel risk ledger.
//!
//! This crate owns the single most important compatibility contract in the
//! system: the canonical byte form of a risk assertion. The signer and the
//! verifier are different components, potentially different implementations,
//! and must agree on it byte-for-byte.
//!
//! # Core Capabilities
//!
//! - **Canonicalization**: [`RiskAssertion::to_canonical_bytes`] and strict re-parsing
//! - **Verification**: the injected [`SignatureVerifier`] capability, backed by Ed25519
//! - **Signing**: [`AssertionSigner`], the reference signer used by the risk oracle
//!
//! # Security Principles
//!
//! - Signature validity depends only on the assertion's own fields
//! - Secrets are zeroized and never logged
//! - Strict Ed25519 verification rejects malleable and small-order signatures

pub mod canonical;
pub mod signing;
pub mod verify;

#[cfg(test)]
mod test_vectors;

pub use canonical::{CanonicalError, RiskAssertion, CANONICAL_FORMAT_VERSION};
pub use signing::{
    AssertionSigner, SignedAssertion, SigningError, SigningMetrics, MAX_RISK_SCORE,
};
pub use verify::{verify_assertion, AssertionVerifier, Ed25519Verifier, SignatureVerifier};
