//! Core types shared by signer, verifier and ledger.
//!
//! Keys and signatures are fixed-size byte arrays. Their serde form is a
//! lowercase hex string, which is also how the signing service publishes them.

use crate::error::{CoreError, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Size of an authority public key in bytes.
pub const AUTHORITY_KEY_LEN: usize = 32;

/// Size of an authority signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Account identifier of a scored wallet, in its native string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a well-formed Stellar account id: `G` followed by 55 base32 characters.
    pub fn is_stellar_account(&self) -> bool {
        self.0.len() == 56
            && self.0.starts_with('G')
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WalletId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 32-byte Ed25519 public key of the trusted authority.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorityKey([u8; AUTHORITY_KEY_LEN]);

impl AuthorityKey {
    pub fn from_bytes(bytes: [u8; AUTHORITY_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; AUTHORITY_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn from_hex(encoded: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(encoded.trim())?)
    }

    pub fn as_bytes(&self) -> &[u8; AUTHORITY_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Stable identifier for logs: first 16 bytes of the BLAKE3 hash of the key, hex encoded.
    pub fn key_id(&self) -> String {
        let hash = blake3::hash(&self.0);
        hex::encode(&hash.as_bytes()[..16])
    }
}

impl fmt::Debug for AuthorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthorityKey({})", self.to_hex())
    }
}

impl Serialize for AuthorityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AuthorityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded).map_err(de::Error::custom)
    }
}

/// 64-byte Ed25519 signature over a canonical assertion.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SignatureBytes([u8; SIGNATURE_LEN]);

impl SignatureBytes {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SIGNATURE_LEN] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn from_hex(encoded: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(encoded.trim())?)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({}..)", hex::encode(&self.0[..8]))
    }
}

impl Serialize for SignatureBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SignatureBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded).map_err(de::Error::custom)
    }
}
