use super::{Backend, PersistedState, StoreResult};
use crate::ledger::RiskRecord;
use sentinel_core::{AuthorityKey, SequencedEvent, WalletId};

/// Volatile backend. The ledger's in-memory view is the only copy of the state.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    fn load(&mut self) -> StoreResult<PersistedState> {
        Ok(PersistedState::default())
    }

    fn commit_authority(
        &mut self,
        _key: &AuthorityKey,
        _events: &[SequencedEvent],
    ) -> StoreResult<()> {
        Ok(())
    }

    fn commit_update(
        &mut self,
        _wallet: &WalletId,
        _record: &RiskRecord,
        _events: &[SequencedEvent],
    ) -> StoreResult<()> {
        Ok(())
    }
}
