//! Canonical serialization of risk assertions.
//!
//! The signed message is the compact JSON text of the assertion with keys in
//! lexicographic order and no whitespace:
//!
//! ```text
//! {"risk_score":87,"timestamp":1737718800,"wallet":"GBRP...OX2H"}
//! ```
//!
//! Integers are plain decimal. The wallet string is escaped exactly like the
//! oracle's JSON encoder with ASCII-only output: `"` and `\` are
//! backslash-escaped, `\b \f \n \r \t` use their short forms, and every other
//! character outside printable ASCII becomes a lowercase `\u00xx` escape, with
//! astral code points written as UTF-16 surrogate pairs.
//!
//! The encoder is hand-written: the byte layout must not follow struct field
//! order or serializer defaults.

use sentinel_core::WalletId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the canonical wire format produced by this module.
pub const CANONICAL_FORMAT_VERSION: u32 = 1;

/// The signed risk claim: wallet, score and signer timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskAssertion {
    /// Wallet being scored
    pub wallet: WalletId,
    /// Risk score, valid range 0-100
    pub risk_score: u32,
    /// Seconds since the Unix epoch, set by the signer
    pub timestamp: u64,
}

/// Errors produced while parsing canonical bytes.
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("Malformed assertion: {0}")]
    Malformed(String),

    #[error("Assertion is valid JSON but not in canonical form")]
    NotCanonical,
}

impl RiskAssertion {
    pub fn new(wallet: impl Into<WalletId>, risk_score: u32, timestamp: u64) -> Self {
        Self {
            wallet: wallet.into(),
            risk_score,
            timestamp,
        }
    }

    /// Canonical message bytes that get signed and verified.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        self.to_canonical_string().into_bytes()
    }

    pub fn to_canonical_string(&self) -> String {
        let wallet = self.wallet.as_str();
        let mut out = String::with_capacity(48 + wallet.len());

        out.push_str("{\"risk_score\":");
        out.push_str(&self.risk_score.to_string());
        out.push_str(",\"timestamp\":");
        out.push_str(&self.timestamp.to_string());
        out.push_str(",\"wallet\":");
        push_json_string(&mut out, wallet);
        out.push('}');

        out
    }

    /// Parse canonical bytes back into an assertion.
    ///
    /// Only input that re-serializes to exactly the same bytes is accepted, so
    /// reordered keys, extra whitespace or alternative escapes are rejected.
    pub fn from_canonical(bytes: &[u8]) -> Result<Self, CanonicalError> {
        let assertion: RiskAssertion = serde_json::from_slice(bytes)
            .map_err(|e| CanonicalError::Malformed(e.to_string()))?;

        if assertion.to_canonical_bytes() != bytes {
            return Err(CanonicalError::NotCanonical);
        }

        Ok(assertion)
    }
}

fn push_json_string(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
}
