//! The ledger entry point.
//!
//! [`Sentinel`] wires the components together and owns the submission
//! pipeline. Checks run in a fixed order and the first failure wins:
//!
//! 1. `Uninitialized`: no authority key registered
//! 2. `InvalidSignature`: signature does not verify over the canonical bytes
//! 3. `StaleTimestamp`: outside the replay window, or older than the stored record
//! 4. `ScoreOutOfRange`: score above 100
//!
//! A rejected submission changes nothing: no record, no notification.

use crate::authority::AuthorityRegistry;
use crate::clock::{Clock, SystemClock};
use crate::decision::{Decision, DecisionEngine};
use crate::emitter::EventEmitter;
use crate::error::{Result, SentinelError};
use crate::ledger::{RiskLedger, RiskRecord};
use crate::query::QueryFacade;
use crate::replay::ReplayGuard;
use crate::store::{Backend, MemoryBackend, StoreError};
use sentinel_core::{
    AuthorityKey, EventLog, LedgerConfig, SentinelConfig, SequencedEvent, SignatureBytes, WalletId,
};
use sentinel_crypto::{verify_assertion, Ed25519Verifier, RiskAssertion, SignatureVerifier};
use tracing::{error, info, warn};

pub use sentinel_crypto::MAX_RISK_SCORE;

/// Submission counters for observability.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SentinelMetrics {
    pub submissions_accepted_total: u64,
    pub submissions_rejected_total: u64,
    pub invalid_signature_total: u64,
    pub stale_timestamp_total: u64,
}

pub struct Sentinel<V = Ed25519Verifier, C = SystemClock> {
    registry: AuthorityRegistry,
    guard: ReplayGuard,
    ledger: RiskLedger,
    emitter: EventEmitter,
    verifier: V,
    clock: C,
    metrics: SentinelMetrics,
}

impl<V, C> std::fmt::Debug for Sentinel<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sentinel")
            .field("registry", &self.registry)
            .field("guard", &self.guard)
            .field("ledger", &self.ledger)
            .field("events", &self.emitter.len())
            .finish_non_exhaustive()
    }
}

impl Sentinel<Ed25519Verifier, SystemClock> {
    /// Open a production ledger: Ed25519, the system clock, and the configured storage.
    pub fn open(config: &SentinelConfig) -> Result<Self> {
        let backend: Box<dyn Backend> = match &config.storage.path {
            #[cfg(feature = "sqlite")]
            Some(path) => Box::new(crate::store::SqliteBackend::open(path)?),
            #[cfg(not(feature = "sqlite"))]
            Some(path) => {
                return Err(StoreError::Unsupported(format!(
                    "{} requires the sqlite feature",
                    path.display()
                ))
                .into())
            }
            None => Box::new(MemoryBackend),
        };

        Self::with_backend(&config.ledger, Ed25519Verifier, SystemClock::new(), backend)
    }
}

impl<V: SignatureVerifier, C: Clock> Sentinel<V, C> {
    /// A fresh, uninitialized ledger with in-memory storage.
    pub fn new(config: &LedgerConfig, verifier: V, clock: C) -> Result<Self> {
        Self::with_backend(config, verifier, clock, Box::new(MemoryBackend))
    }

    /// Restore a ledger from `backend` and write every later change through it.
    ///
    /// `config` is validated first; an invalid replay window is rejected
    /// before the backend is touched.
    pub fn with_backend(
        config: &LedgerConfig,
        verifier: V,
        clock: C,
        mut backend: Box<dyn Backend>,
    ) -> Result<Self> {
        config.validate()?;
        let state = backend.load()?;

        let log = EventLog::restore(state.events).ok_or_else(|| {
            StoreError::Corrupted("notification sequence numbers are not contiguous".to_string())
        })?;
        if state.authority.is_none() && !(state.records.is_empty() && log.is_empty()) {
            return Err(StoreError::Corrupted(
                "records present without an authority key".to_string(),
            )
            .into());
        }

        info!(
            initialized = state.authority.is_some(),
            records = state.records.len(),
            events = log.len(),
            "Ledger restored"
        );

        Ok(Self {
            registry: AuthorityRegistry::restore(state.authority),
            guard: ReplayGuard::from_config(config),
            ledger: RiskLedger::restore(
                DecisionEngine::new(config.limit_amount),
                backend,
                state.records,
            ),
            emitter: EventEmitter::restore(log),
            verifier,
            clock,
            metrics: SentinelMetrics::default(),
        })
    }

    /// Register the authority key. Succeeds exactly once per ledger.
    pub fn initialize(&mut self, key: AuthorityKey) -> Result<()> {
        if self.registry.is_initialized() {
            warn!(key_id = %key.key_id(), "Rejected second initialization");
            return Err(SentinelError::AlreadyInitialized);
        }

        self.ledger.persist_authority(&key, &mut self.emitter)?;
        self.registry.initialize(key)?;

        info!(key_id = %key.key_id(), "Authority key registered");
        Ok(())
    }

    /// Verify, check, decide, and store a signed assertion.
    pub fn submit_risk(
        &mut self,
        assertion: &RiskAssertion,
        signature: &SignatureBytes,
    ) -> Result<RiskRecord> {
        let result = self.process_submission(assertion, signature);

        match &result {
            Ok(record) => {
                self.metrics.submissions_accepted_total += 1;
                info!(
                    wallet = %assertion.wallet,
                    risk_score = record.risk_score,
                    decision = ?record.decision,
                    timestamp = record.last_updated,
                    "Risk assertion accepted"
                );
            }
            Err(e) => {
                self.metrics.submissions_rejected_total += 1;
                match e {
                    SentinelError::InvalidSignature => self.metrics.invalid_signature_total += 1,
                    SentinelError::StaleTimestamp { .. } => {
                        self.metrics.stale_timestamp_total += 1
                    }
                    SentinelError::Storage(store_error) => {
                        error!(
                            wallet = %assertion.wallet,
                            error = %store_error,
                            "Storage failure while applying submission"
                        );
                    }
                    _ => {}
                }
                warn!(
                    wallet = %assertion.wallet,
                    timestamp = assertion.timestamp,
                    kind = e.kind(),
                    error = %e,
                    "Risk assertion rejected"
                );
            }
        }

        result
    }

    fn process_submission(
        &mut self,
        assertion: &RiskAssertion,
        signature: &SignatureBytes,
    ) -> Result<RiskRecord> {
        let key = self.registry.get_authority_key()?;

        if !verify_assertion(&self.verifier, key, assertion, signature) {
            return Err(SentinelError::InvalidSignature);
        }

        let now = self.clock.now();
        let last_updated = self
            .ledger
            .get(&assertion.wallet)
            .map(|record| record.last_updated);
        self.guard
            .check(assertion.timestamp, now, last_updated)
            .map_err(|reason| SentinelError::StaleTimestamp {
                timestamp: assertion.timestamp,
                reason,
            })?;

        if assertion.risk_score > MAX_RISK_SCORE {
            return Err(SentinelError::ScoreOutOfRange(assertion.risk_score));
        }

        let record = self.ledger.apply(
            &assertion.wallet,
            assertion.risk_score,
            assertion.timestamp,
            &mut self.emitter,
        )?;
        Ok(record)
    }

    pub fn query(&self) -> QueryFacade<'_> {
        QueryFacade::new(&self.ledger)
    }

    pub fn check_permission(&self, wallet: &WalletId) -> Decision {
        self.query().check_permission(wallet)
    }

    pub fn is_frozen(&self, wallet: &WalletId) -> bool {
        self.query().is_frozen(wallet)
    }

    pub fn get_risk(&self, wallet: &WalletId) -> Option<RiskRecord> {
        self.query().get_risk(wallet)
    }

    pub fn get_oracle_pubkey(&self) -> Result<AuthorityKey> {
        self.registry.get_authority_key().copied()
    }

    pub fn events_since(&self, from_seq: u64, limit: usize) -> &[SequencedEvent] {
        self.emitter.events_since(from_seq, limit)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn metrics(&self) -> &SentinelMetrics {
        &self.metrics
    }
}
