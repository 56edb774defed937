//! Sentinel Ledger - trust-gated risk records
//!
//! This crate implements the on-ledger half of the Sentinel system: a small
//! authenticated key-value store where writes are accepted only when signed by
//! a single registered authority, and every stored value carries a
//! deterministic decision.
//!
//! # Architecture
//!
//! Submissions flow through the following pipeline:
//! 1. Authority key looked up in `AuthorityRegistry`
//! 2. Signature over the canonical assertion checked by the injected verifier
//! 3. Freshness checked by `ReplayGuard`
//! 4. Score range validated
//! 5. Decision computed by `DecisionEngine`
//! 6. Record replaced atomically in `RiskLedger`
//! 7. Notifications published by `EventEmitter`
//!
//! Reads go through `QueryFacade` and never touch the pipeline above.
//!
//! # Examples
//!
//! ```
//! use sentinel_core::LedgerConfig;
//! use sentinel_crypto::{AssertionSigner, Ed25519Verifier, RiskAssertion};
//! use sentinel_ledger::{Decision, ManualClock, Sentinel};
//!
//! let mut signer = AssertionSigner::generate();
//! let clock = ManualClock::new(1_737_718_800);
//! let mut sentinel = Sentinel::new(&LedgerConfig::default(), Ed25519Verifier, clock).unwrap();
//! sentinel.initialize(signer.public_key()).unwrap();
//!
//! let assertion = RiskAssertion::new("W1", 87, 1_737_718_800);
//! let signed = signer.sign(&assertion).unwrap();
//! sentinel.submit_risk(&signed.payload, &signed.signature).unwrap();
//!
//! assert_eq!(sentinel.check_permission(&"W1".into()), Decision::Freeze);
//! ```

pub mod authority;
pub mod clock;
pub mod decision;
pub mod emitter;
pub mod error;
pub mod ledger;
pub mod query;
pub mod replay;
pub mod sentinel;
pub mod store;

pub use authority::AuthorityRegistry;
pub use clock::{Clock, ManualClock, SystemClock};
pub use decision::{
    BlockReason, Decision, DecisionEngine, Enforcement, FREEZE_THRESHOLD, LIMIT_THRESHOLD,
};
pub use emitter::EventEmitter;
pub use error::{Result, SentinelError, Staleness};
pub use ledger::{RiskLedger, RiskRecord};
pub use query::QueryFacade;
pub use replay::{check_fresh, ReplayGuard};
pub use sentinel::{Sentinel, SentinelMetrics, MAX_RISK_SCORE};
pub use store::{Backend, MemoryBackend, PersistedState, StoreError, StoreResult};

#[cfg(feature = "sqlite")]
pub use store::SqliteBackend;
