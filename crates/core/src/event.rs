//! Notification schema for ledger state changes.
//!
//! Every accepted submission produces a `RISK_UPDATED` notification, followed
//! by `FROZEN` or `LIMITED` when the new decision is restrictive. Notifications
//! are appended to an [`EventLog`] with gap-free sequence numbers so off-ledger
//! observers can page through the stream.

use crate::types::WalletId;
use serde::{Deserialize, Serialize};

/// Topic names as published on the notification stream.
pub mod topics {
    pub const INITIALIZED: &str = "INITIALIZED";
    pub const RISK_UPDATED: &str = "RISK_UPDATED";
    pub const FROZEN: &str = "FROZEN";
    pub const LIMITED: &str = "LIMITED";
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskEvent {
    /// The authority key was registered.
    Initialized { key_id: String },
    /// A submission was accepted.
    RiskUpdated {
        wallet: WalletId,
        risk_score: u32,
        timestamp: u64,
    },
    /// The wallet's decision is now `Freeze`.
    Frozen { wallet: WalletId, risk_score: u32 },
    /// The wallet's decision is now `Limit(limit)`.
    Limited {
        wallet: WalletId,
        risk_score: u32,
        limit: u32,
    },
}

impl RiskEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            RiskEvent::Initialized { .. } => topics::INITIALIZED,
            RiskEvent::RiskUpdated { .. } => topics::RISK_UPDATED,
            RiskEvent::Frozen { .. } => topics::FROZEN,
            RiskEvent::Limited { .. } => topics::LIMITED,
        }
    }

    pub fn wallet(&self) -> Option<&WalletId> {
        match self {
            RiskEvent::Initialized { .. } => None,
            RiskEvent::RiskUpdated { wallet, .. }
            | RiskEvent::Frozen { wallet, .. }
            | RiskEvent::Limited { wallet, .. } => Some(wallet),
        }
    }

    /// True for notifications that signal a restrictive decision.
    pub fn is_restrictive(&self) -> bool {
        matches!(self, RiskEvent::Frozen { .. } | RiskEvent::Limited { .. })
    }
}

/// A notification with its position in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    /// Position in the stream, starting at 1
    pub seq_no: u64,
    #[serde(flatten)]
    pub event: RiskEvent,
}

/// Append-only notification stream.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<SequencedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted entries, which must be ordered and gap-free.
    ///
    /// Returns `None` when the entries do not form a contiguous sequence from 1.
    pub fn restore(entries: Vec<SequencedEvent>) -> Option<Self> {
        let contiguous = entries
            .iter()
            .enumerate()
            .all(|(i, entry)| entry.seq_no == i as u64 + 1);

        contiguous.then_some(Self { entries })
    }

    /// Sequence number the next appended notification will receive.
    pub fn next_seq(&self) -> u64 {
        self.entries.len() as u64 + 1
    }

    /// Assign sequence numbers to `events` without appending them.
    pub fn stage(&self, events: Vec<RiskEvent>) -> Vec<SequencedEvent> {
        let first = self.next_seq();
        events
            .into_iter()
            .enumerate()
            .map(|(i, event)| SequencedEvent {
                seq_no: first + i as u64,
                event,
            })
            .collect()
    }

    /// Append entries produced by [`EventLog::stage`] on this log.
    pub fn extend(&mut self, staged: Vec<SequencedEvent>) {
        debug_assert!(staged
            .iter()
            .enumerate()
            .all(|(i, entry)| entry.seq_no == self.next_seq() + i as u64));
        self.entries.extend(staged);
    }

    /// Up to `limit` notifications starting at `from_seq` (inclusive).
    pub fn events_since(&self, from_seq: u64, limit: usize) -> &[SequencedEvent] {
        let start = (from_seq.max(1) - 1).min(self.entries.len() as u64) as usize;
        let end = start.saturating_add(limit).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn latest_seq(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.seq_no)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
