//! Read-only view over the risk ledger.

use crate::decision::Decision;
use crate::ledger::{RiskLedger, RiskRecord};
use sentinel_core::WalletId;

/// Side-effect-free queries. Wallets with no record are unrestricted.
#[derive(Debug, Clone, Copy)]
pub struct QueryFacade<'a> {
    ledger: &'a RiskLedger,
}

impl<'a> QueryFacade<'a> {
    pub fn new(ledger: &'a RiskLedger) -> Self {
        Self { ledger }
    }

    /// Stored decision, or `Allow` when the wallet has no record.
    pub fn check_permission(&self, wallet: &WalletId) -> Decision {
        self.ledger
            .get(wallet)
            .map(|record| record.decision)
            .unwrap_or(Decision::Allow)
    }

    pub fn is_frozen(&self, wallet: &WalletId) -> bool {
        self.check_permission(wallet).is_frozen()
    }

    pub fn get_risk(&self, wallet: &WalletId) -> Option<RiskRecord> {
        self.ledger.get(wallet).copied()
    }
}
