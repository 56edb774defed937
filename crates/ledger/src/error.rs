//! Error types for ledger operations.

use crate::store::StoreError;
use sentinel_core::CoreError;
use thiserror::Error;

/// Why an assertion's timestamp fell outside the accepted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Staleness {
    /// Older than the replay window.
    #[error("assertion is {age}s old (max {max_age}s)")]
    Expired { age: u64, max_age: u64 },

    /// Dated after the current ledger time.
    #[error("assertion is {ahead}s in the future (tolerance {tolerance}s)")]
    FutureDated { ahead: u64, tolerance: u64 },

    /// Older than the wallet's stored record.
    #[error("assertion predates the stored record (last_updated {last_updated})")]
    Regressed { last_updated: u64 },
}

/// Errors returned by ledger operations.
///
/// Every variant aborts the operation with no state change.
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("Ledger not initialized: no authority key registered")]
    Uninitialized,

    #[error("Ledger already initialized")]
    AlreadyInitialized,

    #[error("Invalid authority signature")]
    InvalidSignature,

    #[error("Stale timestamp {timestamp}: {reason}")]
    StaleTimestamp { timestamp: u64, reason: Staleness },

    #[error("Risk score {0} outside 0-100")]
    ScoreOutOfRange(u32),

    /// Host storage failed. Not part of the submission contract.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Ledger constants rejected at construction.
    #[error("Invalid configuration: {0}")]
    Config(#[from] CoreError),
}

impl SentinelError {
    /// Stable name of the failure kind, as reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            SentinelError::Uninitialized => "Uninitialized",
            SentinelError::AlreadyInitialized => "AlreadyInitialized",
            SentinelError::InvalidSignature => "InvalidSignature",
            SentinelError::StaleTimestamp { .. } => "StaleTimestamp",
            SentinelError::ScoreOutOfRange(_) => "ScoreOutOfRange",
            SentinelError::Storage(_) => "Storage",
            SentinelError::Config(_) => "Config",
        }
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, SentinelError>;
