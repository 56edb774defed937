//! Replay protection for signed assertions.
//!
//! A validly signed assertion stays replayable for as long as it is accepted,
//! so acceptance is bounded on both sides of the ledger clock:
//! - older than `max_age` seconds: rejected
//! - dated after the ledger clock by more than the future tolerance: rejected
//! - older than the wallet's stored `last_updated`: rejected
//!
//! The default future tolerance is zero. Signature validity never depends on
//! any of this; these checks run after verification and fail distinctly.

use crate::error::Staleness;
use sentinel_core::LedgerConfig;
use tracing::debug;

/// Recommended replay window in seconds.
pub const DEFAULT_MAX_AGE_SECS: u64 = 300;

/// Zero-tolerance freshness check: accept iff
/// `assertion_timestamp <= current_time` and `current_time - assertion_timestamp <= max_age`.
pub fn check_fresh(assertion_timestamp: u64, current_time: u64, max_age: u64) -> bool {
    assertion_timestamp <= current_time && current_time - assertion_timestamp <= max_age
}

/// Freshness and ordering policy applied at the submission boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayGuard {
    max_age: u64,
    future_tolerance: u64,
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE_SECS, 0)
    }
}

impl ReplayGuard {
    pub fn new(max_age: u64, future_tolerance: u64) -> Self {
        Self {
            max_age,
            future_tolerance,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.max_age_secs, config.max_future_skew_secs)
    }

    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    pub fn future_tolerance(&self) -> u64 {
        self.future_tolerance
    }

    /// Check `timestamp` against the ledger clock and the wallet's last accepted timestamp.
    ///
    /// An equal `last_updated` is accepted: successive timestamps only need to be non-decreasing.
    pub fn check(
        &self,
        timestamp: u64,
        now: u64,
        last_updated: Option<u64>,
    ) -> Result<(), Staleness> {
        if timestamp > now {
            let ahead = timestamp - now;
            if ahead > self.future_tolerance {
                debug!(timestamp, now, ahead, "Rejecting future-dated assertion");
                return Err(Staleness::FutureDated {
                    ahead,
                    tolerance: self.future_tolerance,
                });
            }
        } else {
            let age = now - timestamp;
            if age > self.max_age {
                debug!(timestamp, now, age, "Rejecting expired assertion");
                return Err(Staleness::Expired {
                    age,
                    max_age: self.max_age,
                });
            }
        }

        match last_updated {
            Some(last_updated) if timestamp < last_updated => {
                debug!(timestamp, last_updated, "Rejecting regressed assertion");
                Err(Staleness::Regressed { last_updated })
            }
            _ => Ok(()),
        }
    }
}
