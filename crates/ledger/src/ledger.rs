//! Risk ledger: the per-wallet record store.
//!
//! Holds at most one [`RiskRecord`] per wallet. The only write path is
//! [`RiskLedger::apply`], which replaces the whole record in one step; there is
//! no delete, history, or partial update.

use crate::decision::{Decision, DecisionEngine};
use crate::emitter::EventEmitter;
use crate::store::{Backend, StoreResult};
use sentinel_core::{AuthorityKey, RiskEvent, SequencedEvent, WalletId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Current risk state of one wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRecord {
    /// 0-100
    pub risk_score: u32,
    /// Timestamp of the accepted assertion
    pub last_updated: u64,
    /// Always `decide(risk_score)` for the deployment's engine
    pub decision: Decision,
}

pub struct RiskLedger {
    engine: DecisionEngine,
    records: HashMap<WalletId, RiskRecord>,
    backend: Box<dyn Backend>,
}

impl std::fmt::Debug for RiskLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskLedger")
            .field("engine", &self.engine)
            .field("records", &self.records.len())
            .finish()
    }
}

impl RiskLedger {
    pub fn new(engine: DecisionEngine, backend: Box<dyn Backend>) -> Self {
        Self::restore(engine, backend, Vec::new())
    }

    /// Rebuild the in-memory view from persisted records.
    pub fn restore(
        engine: DecisionEngine,
        backend: Box<dyn Backend>,
        records: Vec<(WalletId, RiskRecord)>,
    ) -> Self {
        Self {
            engine,
            records: records.into_iter().collect(),
            backend,
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn get(&self, wallet: &WalletId) -> Option<&RiskRecord> {
        self.records.get(wallet)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the record for `wallet` with a freshly decided one.
    ///
    /// The record and its notifications are committed to the backend first;
    /// on failure neither the view nor the notification stream changes.
    pub fn apply(
        &mut self,
        wallet: &WalletId,
        risk_score: u32,
        timestamp: u64,
        emitter: &mut EventEmitter,
    ) -> StoreResult<RiskRecord> {
        let record = RiskRecord {
            risk_score,
            last_updated: timestamp,
            decision: self.engine.decide(risk_score),
        };

        let staged = emitter.stage(EventEmitter::notifications(wallet, &record));
        self.backend.commit_update(wallet, &record, &staged)?;

        let previous = self.records.insert(wallet.clone(), record);
        debug!(
            wallet = %wallet,
            risk_score,
            decision = ?record.decision,
            previous = ?previous.map(|r| r.decision),
            "Risk record replaced"
        );

        emitter.publish(staged);
        Ok(record)
    }

    /// Persist the authority key and its `INITIALIZED` notification.
    pub fn persist_authority(
        &mut self,
        key: &AuthorityKey,
        emitter: &mut EventEmitter,
    ) -> StoreResult<()> {
        let staged: Vec<SequencedEvent> = emitter.stage(vec![RiskEvent::Initialized {
            key_id: key.key_id(),
        }]);
        self.backend.commit_authority(key, &staged)?;
        emitter.publish(staged);
        Ok(())
    }
}
