//! Durable storage for ledger state.
//!
//! The ledger keeps its working set in memory and hands every state change to
//! a [`Backend`] before applying it. A backend commit is all-or-nothing: the
//! record (or authority key) and the notifications it produced land together
//! or not at all.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

use crate::ledger::RiskRecord;
use sentinel_core::{AuthorityKey, SequencedEvent, WalletId};
use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored state corrupted: {0}")]
    Corrupted(String),

    #[error("Unsupported storage configuration: {0}")]
    Unsupported(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Everything a backend returns on startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub authority: Option<AuthorityKey>,
    pub records: Vec<(WalletId, RiskRecord)>,
    /// Ordered by sequence number
    pub events: Vec<SequencedEvent>,
}

/// Write-through persistence for the ledger.
pub trait Backend: Send {
    /// Load the full persisted state.
    fn load(&mut self) -> StoreResult<PersistedState>;

    /// Persist the authority key together with its notifications.
    fn commit_authority(&mut self, key: &AuthorityKey, events: &[SequencedEvent])
        -> StoreResult<()>;

    /// Replace the record for `wallet` and append its notifications.
    fn commit_update(
        &mut self,
        wallet: &WalletId,
        record: &RiskRecord,
        events: &[SequencedEvent],
    ) -> StoreResult<()>;
}
