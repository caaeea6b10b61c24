//! SQLite storage for the last processed domain-event sequence of each entity.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use wix_api::types::EventSequence;

use crate::error::WixError;
use crate::events::SequenceStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Persists `entityEventSequence` high-water marks across restarts.
pub struct SqliteSequenceStore {
    conn: Connection,
}

impl SqliteSequenceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<(), StoreError> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.migrate_v1()?;
            self.conn.pragma_update(None, "user_version", 1)?;
        }
        Ok(())
    }

    fn migrate_v1(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS event_sequences (
                entity_fqdn TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                sequence TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (entity_fqdn, entity_id)
            );",
        )?;
        Ok(())
    }

    pub fn get_sequence(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
    ) -> Result<Option<EventSequence>, StoreError> {
        self.conn
            .query_row(
                "SELECT sequence FROM event_sequences WHERE entity_fqdn = ?1 AND entity_id = ?2",
                params![entity_fqdn, entity_id],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map(|seq| seq.map(EventSequence::new))
            .map_err(StoreError::from)
    }

    pub fn set_sequence(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO event_sequences (entity_fqdn, entity_id, sequence, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(entity_fqdn, entity_id) DO UPDATE SET
                sequence = excluded.sequence,
                updated_at = excluded.updated_at",
            params![
                entity_fqdn,
                entity_id,
                sequence.as_str(),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Records `sequence` if it is greater than the stored one, returning
    /// whether it was recorded.
    ///
    /// Runs under `BEGIN IMMEDIATE`, so another connection to the same file
    /// waits for the write lock instead of reading the old value.
    pub fn advance_sequence(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<bool, StoreError> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let last = self.get_sequence(entity_fqdn, entity_id)?;
        if matches!(&last, Some(last) if sequence <= last) {
            tx.commit()?;
            return Ok(false);
        }
        self.set_sequence(entity_fqdn, entity_id, sequence)?;
        tx.commit()?;
        Ok(true)
    }

    /// Number of entities with a recorded sequence.
    pub fn entity_count(&self) -> Result<i64, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM event_sequences", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl SequenceStore for SqliteSequenceStore {
    fn last_seen(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
    ) -> Result<Option<EventSequence>, WixError> {
        Ok(self.get_sequence(entity_fqdn, entity_id)?)
    }

    fn record(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<(), WixError> {
        Ok(self.set_sequence(entity_fqdn, entity_id, sequence)?)
    }

    fn advance(
        &self,
        entity_fqdn: &str,
        entity_id: &str,
        sequence: &EventSequence,
    ) -> Result<bool, WixError> {
        Ok(self.advance_sequence(entity_fqdn, entity_id, sequence)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_and_init() {
        let store = SqliteSequenceStore::open_in_memory().unwrap();
        let version: i32 = store
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
        assert_eq!(store.entity_count().unwrap(), 0);
    }

    #[test]
    fn set_and_get_sequence() {
        let store = SqliteSequenceStore::open_in_memory().unwrap();
        assert_eq!(store.get_sequence("fqdn", "e1").unwrap(), None);

        store
            .set_sequence("fqdn", "e1", &EventSequence::new("5"))
            .unwrap();
        store
            .set_sequence("fqdn", "e1", &EventSequence::new("7"))
            .unwrap();
        assert_eq!(
            store.get_sequence("fqdn", "e1").unwrap(),
            Some(EventSequence::new("7"))
        );
        assert_eq!(store.entity_count().unwrap(), 1);
    }

    #[test]
    fn advance_only_moves_forward() {
        let store = SqliteSequenceStore::open_in_memory().unwrap();
        assert!(store.advance_sequence("fqdn", "e1", &EventSequence::new("5")).unwrap());
        assert!(!store.advance_sequence("fqdn", "e1", &EventSequence::new("5")).unwrap());
        assert!(!store.advance_sequence("fqdn", "e1", &EventSequence::new("4")).unwrap());
        assert!(store.advance_sequence("fqdn", "e1", &EventSequence::new("10")).unwrap());
        assert_eq!(
            store.get_sequence("fqdn", "e1").unwrap(),
            Some(EventSequence::new("10"))
        );
    }

    #[test]
    fn concurrent_connections_accept_each_sequence_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Barrier;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");
        // Create the schema before the workers race.
        drop(SqliteSequenceStore::open(&path).unwrap());

        let accepted = AtomicUsize::new(0);
        let barrier = Barrier::new(2);
        std::thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| {
                    let store = SqliteSequenceStore::open(&path).unwrap();
                    barrier.wait();
                    for seq in 1..=50 {
                        let sequence = EventSequence::new(seq.to_string());
                        if store.advance_sequence("fqdn", "e1", &sequence).unwrap() {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(accepted.load(Ordering::SeqCst), 50);
        let store = SqliteSequenceStore::open(&path).unwrap();
        assert_eq!(
            store.get_sequence("fqdn", "e1").unwrap(),
            Some(EventSequence::new("50"))
        );
    }

    #[test]
    fn sequences_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");
        {
            let store = SqliteSequenceStore::open(&path).unwrap();
            store
                .set_sequence("fqdn", "e1", &EventSequence::new("99999999999999999999999"))
                .unwrap();
        }
        let store = SqliteSequenceStore::open(&path).unwrap();
        assert_eq!(
            store.get_sequence("fqdn", "e1").unwrap().unwrap().as_str(),
            "99999999999999999999999"
        );
    }
}
