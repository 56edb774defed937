//! End-to-end submission scenarios against a full ledger.

use sentinel_core::{
    topics, AuthorityKey, LedgerConfig, SentinelConfig, SignatureBytes, StorageConfig, WalletId,
};
use sentinel_crypto::{AssertionSigner, Ed25519Verifier, RiskAssertion};
use sentinel_ledger::{
    Decision, Enforcement, ManualClock, Sentinel, SentinelError, SqliteBackend, Staleness,
};
use std::path::{Path, PathBuf};

const NOW: u64 = 1_737_718_800;

/// RFC 8032 test 1 secret key. Publicly known; tests only.
const RFC8032_SECRET_HEX: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

const STELLAR_WALLET: &str = "GBRPYHIL2CI3FNQ4BXLFMNDLFJUNPU2HY3ZMFSHONUCEOASW7QC7OX2H";

/// Signature over the canonical form of (STELLAR_WALLET, 87, 1737718800) with the RFC 8032 key.
const GOLDEN_SIGNATURE_HEX: &str = "03f9c47cdb6c6610cfb95e0ae1543ff9a0dc416a563cc821330e46331f1451f00f609f5888bf8d2733c91597939452fe672cb54dc893c50e4553aff4f8d3e10b";

fn memory_ledger(now: u64) -> Sentinel<Ed25519Verifier, ManualClock> {
    Sentinel::new(&LedgerConfig::default(), Ed25519Verifier, ManualClock::new(now)).unwrap()
}

fn temp_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("sentinel_flow_{}.db", uuid::Uuid::new_v4()))
}

fn cleanup(path: &Path) {
    std::fs::remove_file(path).ok();
    std::fs::remove_file(path.with_extension("db-wal")).ok();
    std::fs::remove_file(path.with_extension("db-shm")).ok();
}

#[test]
fn test_limit_then_replay_rejected() {
    let mut signer = AssertionSigner::generate();
    let mut sentinel = memory_ledger(NOW);
    sentinel.initialize(signer.public_key()).unwrap();
    let wallet = WalletId::from("W1");

    let first = signer.sign(&RiskAssertion::new("W1", 30, NOW)).unwrap();
    let record = sentinel
        .submit_risk(&first.payload, &first.signature)
        .unwrap();
    assert_eq!(record.decision, Decision::Allow);
    assert_eq!(sentinel.check_permission(&wallet), Decision::Allow);

    sentinel.clock().advance(1);
    let second = signer.sign(&RiskAssertion::new("W1", 65, NOW + 1)).unwrap();
    sentinel
        .submit_risk(&second.payload, &second.signature)
        .unwrap();
    assert_eq!(sentinel.check_permission(&wallet), Decision::Limit(5000));

    // Re-submitting the first, validly signed assertion must not roll the wallet back
    let replay = sentinel.submit_risk(&first.payload, &first.signature);
    assert!(matches!(
        replay,
        Err(SentinelError::StaleTimestamp {
            reason: Staleness::Regressed { last_updated },
            ..
        }) if last_updated == NOW + 1
    ));
    assert_eq!(sentinel.check_permission(&wallet), Decision::Limit(5000));

    let risk = sentinel.get_risk(&wallet).unwrap();
    assert_eq!(risk.risk_score, 65);
    assert_eq!(risk.last_updated, NOW + 1);
}

#[test]
fn test_golden_vector_accepted_and_frozen() {
    let signer = AssertionSigner::from_hex(RFC8032_SECRET_HEX).unwrap();
    let mut sentinel = memory_ledger(NOW);
    sentinel.initialize(signer.public_key()).unwrap();

    let assertion = RiskAssertion::new(STELLAR_WALLET, 87, NOW);
    let signature = SignatureBytes::from_hex(GOLDEN_SIGNATURE_HEX).unwrap();
    let record = sentinel.submit_risk(&assertion, &signature).unwrap();

    assert_eq!(record.decision, Decision::Freeze);
    let wallet = WalletId::from(STELLAR_WALLET);
    assert!(sentinel.is_frozen(&wallet));
    assert_eq!(
        sentinel.check_permission(&wallet).enforce(1),
        Enforcement::Blocked(sentinel_ledger::BlockReason::Frozen)
    );
}

#[test]
fn test_forged_key_rejected() {
    let oracle = AssertionSigner::generate();
    let mut forger = AssertionSigner::generate();
    let mut sentinel = memory_ledger(NOW);
    sentinel.initialize(oracle.public_key()).unwrap();

    let forged = forger.sign(&RiskAssertion::new("W1", 0, NOW)).unwrap();
    assert!(matches!(
        sentinel.submit_risk(&forged.payload, &forged.signature),
        Err(SentinelError::InvalidSignature)
    ));
    assert_eq!(sentinel.get_risk(&"W1".into()), None);
    assert_eq!(sentinel.events_since(1, 100).len(), 1);
}

#[test]
fn test_unknown_wallet_is_allowed() {
    let sentinel = memory_ledger(NOW);
    let wallet = WalletId::from("never-seen");

    assert_eq!(sentinel.check_permission(&wallet), Decision::Allow);
    assert!(!sentinel.is_frozen(&wallet));
    assert!(sentinel.get_risk(&wallet).is_none());
}

#[test]
fn test_second_initialize_rejected() {
    let oracle = AssertionSigner::generate();
    let mut sentinel = memory_ledger(NOW);
    sentinel.initialize(oracle.public_key()).unwrap();

    let result = sentinel.initialize(AuthorityKey::from_bytes([5u8; 32]));
    assert!(matches!(result, Err(SentinelError::AlreadyInitialized)));
    assert_eq!(sentinel.get_oracle_pubkey().unwrap(), oracle.public_key());
}

#[test]
fn test_notification_stream_order() {
    let mut signer = AssertionSigner::generate();
    let mut sentinel = memory_ledger(NOW);
    sentinel.initialize(signer.public_key()).unwrap();

    for (wallet, score) in [("A", 10), ("B", 60), ("C", 95)] {
        let signed = signer.sign(&RiskAssertion::new(wallet, score, NOW)).unwrap();
        sentinel
            .submit_risk(&signed.payload, &signed.signature)
            .unwrap();
    }

    let events = sentinel.events_since(1, 100);
    let seen: Vec<(u64, &str)> = events
        .iter()
        .map(|e| (e.seq_no, e.event.topic()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (1, topics::INITIALIZED),
            (2, topics::RISK_UPDATED),
            (3, topics::RISK_UPDATED),
            (4, topics::LIMITED),
            (5, topics::RISK_UPDATED),
            (6, topics::FROZEN),
        ]
    );

    let page = sentinel.events_since(4, 2);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].seq_no, 4);
}

#[test]
fn test_sqlite_state_survives_reopen() {
    let path = temp_db_path();
    let mut signer = AssertionSigner::generate();

    {
        let mut sentinel = Sentinel::with_backend(
            &LedgerConfig::default(),
            Ed25519Verifier,
            ManualClock::new(NOW),
            Box::new(SqliteBackend::open(&path).unwrap()),
        )
        .unwrap();
        sentinel.initialize(signer.public_key()).unwrap();

        let signed = signer.sign(&RiskAssertion::new("W1", 65, NOW)).unwrap();
        sentinel
            .submit_risk(&signed.payload, &signed.signature)
            .unwrap();
    }

    let mut sentinel = Sentinel::with_backend(
        &LedgerConfig::default(),
        Ed25519Verifier,
        ManualClock::new(NOW + 10),
        Box::new(SqliteBackend::open(&path).unwrap()),
    )
    .unwrap();

    assert_eq!(sentinel.get_oracle_pubkey().unwrap(), signer.public_key());
    assert_eq!(sentinel.check_permission(&"W1".into()), Decision::Limit(5000));
    assert_eq!(sentinel.events_since(1, 100).len(), 3);
    assert!(matches!(
        sentinel.initialize(signer.public_key()),
        Err(SentinelError::AlreadyInitialized)
    ));

    // Monotonicity holds across restarts
    let older = signer.sign(&RiskAssertion::new("W1", 5, NOW - 1)).unwrap();
    assert!(matches!(
        sentinel.submit_risk(&older.payload, &older.signature),
        Err(SentinelError::StaleTimestamp { .. })
    ));

    let newer = signer.sign(&RiskAssertion::new("W1", 5, NOW + 10)).unwrap();
    sentinel
        .submit_risk(&newer.payload, &newer.signature)
        .unwrap();
    assert_eq!(sentinel.events_since(4, 100).len(), 1);

    drop(sentinel);
    cleanup(&path);
}

#[test]
fn test_open_from_config() {
    let path = temp_db_path();
    let config = SentinelConfig {
        storage: StorageConfig {
            path: Some(path.clone()),
        },
        ..SentinelConfig::default()
    };

    let oracle = AssertionSigner::generate();
    {
        let mut sentinel = Sentinel::open(&config).unwrap();
        sentinel.initialize(oracle.public_key()).unwrap();
    }

    let sentinel = Sentinel::open(&config).unwrap();
    assert_eq!(sentinel.get_oracle_pubkey().unwrap(), oracle.public_key());

    drop(sentinel);
    cleanup(&path);
}
