//! Core functionality for the Sentinel risk ledger.
//!
//! This crate provides the shared types, configuration, logging setup and
//! notification schema used by the signer, the verifier and the ledger.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod types;

pub use config::{LedgerConfig, LogFormat, LoggingConfig, SentinelConfig, StorageConfig};
pub use error::{CoreError, Result};
pub use event::{topics, EventLog, RiskEvent, SequencedEvent};
pub use types::{AuthorityKey, SignatureBytes, WalletId, AUTHORITY_KEY_LEN, SIGNATURE_LEN};
