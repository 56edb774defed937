//! Authority registry: the single trusted verification key.
//!
//! The key is set once and never rotated. Rotation means deploying a new
//! ledger instance.

use crate::error::{Result, SentinelError};
use sentinel_core::AuthorityKey;

/// Write-once cell holding the authority key.
#[derive(Debug, Clone, Default)]
pub struct AuthorityRegistry {
    key: Option<AuthorityKey>,
}

impl AuthorityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the registry from persisted state.
    pub fn restore(key: Option<AuthorityKey>) -> Self {
        Self { key }
    }

    /// Store `key`. Fails with `AlreadyInitialized` if a key is already set.
    pub fn initialize(&mut self, key: AuthorityKey) -> Result<()> {
        if self.key.is_some() {
            return Err(SentinelError::AlreadyInitialized);
        }
        self.key = Some(key);
        Ok(())
    }

    pub fn get_authority_key(&self) -> Result<&AuthorityKey> {
        self.key.as_ref().ok_or(SentinelError::Uninitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.key.is_some()
    }
}
