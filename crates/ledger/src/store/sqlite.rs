//! SQLite backend with WAL mode.
//!
//! Schema:
//! - `authority`: at most one row holding the 32-byte authority key
//! - `risk_records`: one row per wallet, replaced on every accepted submission
//! - `risk_events`: append-only notification stream keyed by `seq_no`
//!
//! Each commit runs in a single transaction.

use super::{Backend, PersistedState, StoreError, StoreResult};
use crate::decision::Decision;
use crate::ledger::RiskRecord;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use sentinel_core::{AuthorityKey, RiskEvent, SequencedEvent, WalletId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct SqliteBackend {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteBackend {
    /// Create or open a database file, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening SQLite ledger store");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Private in-memory database. Nothing survives the process.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS authority (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                public_key BLOB NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            );

            CREATE TABLE IF NOT EXISTS risk_records (
                wallet TEXT PRIMARY KEY,
                risk_score INTEGER NOT NULL,
                last_updated INTEGER NOT NULL,
                decision TEXT NOT NULL CHECK (decision IN ('allow', 'limit', 'freeze')),
                limit_amount INTEGER
            );

            CREATE TABLE IF NOT EXISTS risk_events (
                seq_no INTEGER PRIMARY KEY,
                topic TEXT NOT NULL,
                wallet TEXT,
                body TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_risk_events_wallet ON risk_events(wallet);
            "#,
        )?;

        Ok(())
    }

    fn load_authority(&self) -> StoreResult<Option<AuthorityKey>> {
        let bytes: Option<Vec<u8>> = self
            .conn
            .query_row("SELECT public_key FROM authority WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        bytes
            .map(|bytes| {
                AuthorityKey::from_slice(&bytes)
                    .map_err(|e| StoreError::Corrupted(format!("authority key: {}", e)))
            })
            .transpose()
    }

    fn load_records(&self) -> StoreResult<Vec<(WalletId, RiskRecord)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT wallet, risk_score, last_updated, decision, limit_amount
            FROM risk_records
            ORDER BY wallet
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<i64>>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (wallet, risk_score, last_updated, decision, limit_amount) = row?;
            let risk_score = u32::try_from(risk_score).map_err(|_| {
                StoreError::Corrupted(format!("risk_score {} for {}", risk_score, wallet))
            })?;
            let decision = decode_decision(&decision, limit_amount)
                .ok_or_else(|| StoreError::Corrupted(format!("decision for {}", wallet)))?;

            records.push((
                WalletId::new(wallet),
                RiskRecord {
                    risk_score,
                    last_updated: last_updated as u64,
                    decision,
                },
            ));
        }

        Ok(records)
    }

    fn load_events(&self) -> StoreResult<Vec<SequencedEvent>> {
        let mut stmt = self
            .conn
            .prepare("SELECT seq_no, body FROM risk_events ORDER BY seq_no ASC")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)? as u64, row.get::<_, String>(1)?))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (seq_no, body) = row?;
            let event: RiskEvent = serde_json::from_str(&body).map_err(|e| {
                StoreError::Corrupted(format!("event body at seq_no {}: {}", seq_no, e))
            })?;
            events.push(SequencedEvent { seq_no, event });
        }

        Ok(events)
    }

    fn insert_events(tx: &rusqlite::Transaction, events: &[SequencedEvent]) -> StoreResult<()> {
        for entry in events {
            let body = serde_json::to_string(&entry.event)?;
            tx.execute(
                "INSERT INTO risk_events (seq_no, topic, wallet, body) VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.seq_no as i64,
                    entry.event.topic(),
                    entry.event.wallet().map(WalletId::as_str),
                    body,
                ],
            )?;
        }
        Ok(())
    }

    /// Execute raw SQL (for corruption tests only)
    #[doc(hidden)]
    pub fn __test_execute_raw_sql(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> StoreResult<usize> {
        Ok(self.conn.execute(sql, params)?)
    }
}

impl Backend for SqliteBackend {
    fn load(&mut self) -> StoreResult<PersistedState> {
        let state = PersistedState {
            authority: self.load_authority()?,
            records: self.load_records()?,
            events: self.load_events()?,
        };

        debug!(
            initialized = state.authority.is_some(),
            records = state.records.len(),
            events = state.events.len(),
            "Loaded ledger state"
        );

        Ok(state)
    }

    fn commit_authority(
        &mut self,
        key: &AuthorityKey,
        events: &[SequencedEvent],
    ) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO authority (id, public_key) VALUES (1, ?1)",
            params![key.as_bytes().as_slice()],
        )?;
        Self::insert_events(&tx, events)?;
        tx.commit()?;
        Ok(())
    }

    fn commit_update(
        &mut self,
        wallet: &WalletId,
        record: &RiskRecord,
        events: &[SequencedEvent],
    ) -> StoreResult<()> {
        let (decision, limit_amount) = encode_decision(&record.decision);

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO risk_records (wallet, risk_score, last_updated, decision, limit_amount)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(wallet) DO UPDATE SET
                risk_score = excluded.risk_score,
                last_updated = excluded.last_updated,
                decision = excluded.decision,
                limit_amount = excluded.limit_amount
            "#,
            params![
                wallet.as_str(),
                i64::from(record.risk_score),
                record.last_updated as i64,
                decision,
                limit_amount,
            ],
        )?;
        Self::insert_events(&tx, events)?;
        tx.commit()?;

        debug!(wallet = %wallet, seq_count = events.len(), "Committed risk update");
        Ok(())
    }
}

fn encode_decision(decision: &Decision) -> (&'static str, Option<i64>) {
    match decision {
        Decision::Allow => ("allow", None),
        Decision::Limit(limit) => ("limit", Some(i64::from(*limit))),
        Decision::Freeze => ("freeze", None),
    }
}

fn decode_decision(decision: &str, limit_amount: Option<i64>) -> Option<Decision> {
    match (decision, limit_amount) {
        ("allow", _) => Some(Decision::Allow),
        ("limit", Some(limit)) => u32::try_from(limit).ok().map(Decision::Limit),
        ("freeze", _) => Some(Decision::Freeze),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("sentinel_store_{}.db", uuid::Uuid::new_v4()))
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_file(path.with_extension("db-wal")).ok();
        std::fs::remove_file(path.with_extension("db-shm")).ok();
    }

    fn updated(seq_no: u64, wallet: &str, risk_score: u32, timestamp: u64) -> SequencedEvent {
        SequencedEvent {
            seq_no,
            event: RiskEvent::RiskUpdated {
                wallet: wallet.into(),
                risk_score,
                timestamp,
            },
        }
    }

    #[test]
    fn test_empty_store_loads_default_state() {
        let mut store = SqliteBackend::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), PersistedState::default());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_state_survives_reopen() {
        let path = temp_db_path();
        let key = AuthorityKey::from_bytes([7u8; 32]);
        let record = RiskRecord {
            risk_score: 65,
            last_updated: 1_700_000_000,
            decision: Decision::Limit(5000),
        };

        {
            let mut store = SqliteBackend::open(&path).unwrap();
            let init = SequencedEvent {
                seq_no: 1,
                event: RiskEvent::Initialized {
                    key_id: key.key_id(),
                },
            };
            store.commit_authority(&key, &[init]).unwrap();

            let events = vec![
                updated(2, "W1", 65, 1_700_000_000),
                SequencedEvent {
                    seq_no: 3,
                    event: RiskEvent::Limited {
                        wallet: "W1".into(),
                        risk_score: 65,
                        limit: 5000,
                    },
                },
            ];
            store.commit_update(&"W1".into(), &record, &events).unwrap();
        }

        let mut store = SqliteBackend::open(&path).unwrap();
        let state = store.load().unwrap();
        assert_eq!(state.authority, Some(key));
        assert_eq!(state.records, vec![(WalletId::from("W1"), record)]);
        assert_eq!(state.events.len(), 3);
        assert_eq!(state.events[1], updated(2, "W1", 65, 1_700_000_000));

        cleanup(&path);
    }

    #[test]
    fn test_update_replaces_record() {
        let mut store = SqliteBackend::open_in_memory().unwrap();
        let wallet = WalletId::from("W1");

        let first = RiskRecord {
            risk_score: 87,
            last_updated: 100,
            decision: Decision::Freeze,
        };
        let second = RiskRecord {
            risk_score: 10,
            last_updated: 200,
            decision: Decision::Allow,
        };
        store
            .commit_update(&wallet, &first, &[updated(1, "W1", 87, 100)])
            .unwrap();
        store
            .commit_update(&wallet, &second, &[updated(2, "W1", 10, 200)])
            .unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.records, vec![(wallet, second)]);
        assert_eq!(state.events.len(), 2);
    }

    #[test]
    fn test_failed_commit_leaves_no_partial_state() {
        let mut store = SqliteBackend::open_in_memory().unwrap();
        let record = RiskRecord {
            risk_score: 30,
            last_updated: 100,
            decision: Decision::Allow,
        };
        store
            .commit_update(&"W1".into(), &record, &[updated(1, "W1", 30, 100)])
            .unwrap();

        // Reusing seq_no 1 violates the primary key after the record upsert ran
        let newer = RiskRecord {
            risk_score: 90,
            last_updated: 200,
            decision: Decision::Freeze,
        };
        let result = store.commit_update(&"W1".into(), &newer, &[updated(1, "W1", 90, 200)]);
        assert!(matches!(result, Err(StoreError::Database(_))));

        let state = store.load().unwrap();
        assert_eq!(state.records[0].1, record);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_corrupted_event_body_detected() {
        let mut store = SqliteBackend::open_in_memory().unwrap();
        let record = RiskRecord {
            risk_score: 30,
            last_updated: 100,
            decision: Decision::Allow,
        };
        store
            .commit_update(&"W1".into(), &record, &[updated(1, "W1", 30, 100)])
            .unwrap();

        store
            .__test_execute_raw_sql(
                "UPDATE risk_events SET body = ?1 WHERE seq_no = 1",
                &[&"not json"],
            )
            .unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn test_corrupted_authority_key_detected() {
        let mut store = SqliteBackend::open_in_memory().unwrap();
        store
            .__test_execute_raw_sql(
                "INSERT INTO authority (id, public_key) VALUES (1, ?1)",
                &[&vec![0u8; 5]],
            )
            .unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupted(_))));
    }
}
