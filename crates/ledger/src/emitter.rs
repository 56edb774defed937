//! Notification publishing.
//!
//! Notifications are staged with their sequence numbers before the state
//! change is committed, then published once the commit succeeds. A rejected
//! or failed operation therefore never leaves a notification behind.

use crate::decision::Decision;
use crate::ledger::RiskRecord;
use sentinel_core::{EventLog, RiskEvent, SequencedEvent, WalletId};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct EventEmitter {
    log: EventLog,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(log: EventLog) -> Self {
        Self { log }
    }

    /// Notifications for an accepted submission: always `RISK_UPDATED`, then
    /// `FROZEN` or `LIMITED` when the decision is restrictive.
    pub fn notifications(wallet: &WalletId, record: &RiskRecord) -> Vec<RiskEvent> {
        let mut events = vec![RiskEvent::RiskUpdated {
            wallet: wallet.clone(),
            risk_score: record.risk_score,
            timestamp: record.last_updated,
        }];

        match record.decision {
            Decision::Allow => {}
            Decision::Limit(limit) => events.push(RiskEvent::Limited {
                wallet: wallet.clone(),
                risk_score: record.risk_score,
                limit,
            }),
            Decision::Freeze => events.push(RiskEvent::Frozen {
                wallet: wallet.clone(),
                risk_score: record.risk_score,
            }),
        }

        events
    }

    /// Assign sequence numbers without publishing.
    pub fn stage(&self, events: Vec<RiskEvent>) -> Vec<SequencedEvent> {
        self.log.stage(events)
    }

    /// Publish notifications staged against the current log.
    pub fn publish(&mut self, staged: Vec<SequencedEvent>) {
        for entry in &staged {
            if entry.event.is_restrictive() {
                warn!(
                    seq_no = entry.seq_no,
                    topic = entry.event.topic(),
                    wallet = ?entry.event.wallet().map(WalletId::as_str),
                    "Restrictive decision published"
                );
            } else {
                debug!(
                    seq_no = entry.seq_no,
                    topic = entry.event.topic(),
                    "Notification published"
                );
            }
        }
        self.log.extend(staged);
    }

    pub fn events_since(&self, from_seq: u64, limit: usize) -> &[SequencedEvent] {
        self.log.events_since(from_seq, limit)
    }

    pub fn latest_seq(&self) -> Option<u64> {
        self.log.latest_seq()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
