//! Score-to-decision mapping.
//!
//! Three fixed bands keep the downstream contract small: callers match on
//! [`Decision`] and never re-derive thresholds.
//!
//! | Score | Decision |
//! |---|---|
//! | `< 50` | `Allow` |
//! | `50..80` | `Limit(limit_amount)` |
//! | `>= 80` | `Freeze` |

use serde::{Deserialize, Serialize};

/// Lowest score that yields `Limit`.
pub const LIMIT_THRESHOLD: u32 = 50;

/// Lowest score that yields `Freeze`.
pub const FREEZE_THRESHOLD: u32 = 80;

/// Default amount carried by `Limit` decisions.
pub const DEFAULT_LIMIT_AMOUNT: u32 = 5000;

/// Enforcement outcome handed to integrating protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// No restriction
    Allow,
    /// A single operation must not exceed this amount
    Limit(u32),
    /// Refuse the operation entirely
    Freeze,
}

/// What a protocol should do with one operation of a given amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enforcement {
    Proceed,
    /// Within the limit of a restricted wallet
    ProceedWithWarning { limit: u32 },
    Blocked(BlockReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    Frozen,
    ExceedsLimit { limit: u32 },
    InvalidAmount,
}

impl Decision {
    pub fn is_frozen(&self) -> bool {
        matches!(self, Decision::Freeze)
    }

    pub fn is_restrictive(&self) -> bool {
        !matches!(self, Decision::Allow)
    }

    /// Apply this decision to one operation of `amount`.
    pub fn enforce(&self, amount: i128) -> Enforcement {
        if amount < 0 {
            return Enforcement::Blocked(BlockReason::InvalidAmount);
        }

        match *self {
            Decision::Allow => Enforcement::Proceed,
            Decision::Limit(limit) if amount > i128::from(limit) => {
                Enforcement::Blocked(BlockReason::ExceedsLimit { limit })
            }
            Decision::Limit(limit) => Enforcement::ProceedWithWarning { limit },
            Decision::Freeze => Enforcement::Blocked(BlockReason::Frozen),
        }
    }
}

impl Enforcement {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Enforcement::Blocked(_))
    }
}

/// Pure, total mapping from score to decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionEngine {
    limit_amount: u32,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT_AMOUNT)
    }
}

impl DecisionEngine {
    pub fn new(limit_amount: u32) -> Self {
        Self { limit_amount }
    }

    pub fn limit_amount(&self) -> u32 {
        self.limit_amount
    }

    /// Scores above 100 are rejected before they get here; they map to `Freeze`.
    pub fn decide(&self, risk_score: u32) -> Decision {
        match risk_score {
            s if s < LIMIT_THRESHOLD => Decision::Allow,
            s if s < FREEZE_THRESHOLD => Decision::Limit(self.limit_amount),
            _ => Decision::Freeze,
        }
    }
}
