//! Snapshot slot repository contracts and implementations.
//!
//! # Responsibility
//! - Read and overwrite one named durable slot holding a JSON payload.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A repository is bound to exactly one slot key for its lifetime.
//! - `write_slot` replaces the previous payload; there is no history.
//! - Repositories never interpret the payload.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot slot access.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Slot key or storage layout is not usable.
    InvalidData(String),
    /// Backing store refused the operation.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid snapshot storage: {message}"),
            Self::Unavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value slot holding the serialized aggregate.
pub trait SnapshotRepository {
    /// Slot key this repository reads and writes.
    fn slot_key(&self) -> &str;
    /// Returns the stored payload, or `None` when the slot was never written.
    fn read_slot(&self) -> RepoResult<Option<String>>;
    /// Overwrites the slot with `payload`.
    fn write_slot(&self, payload: &str) -> RepoResult<()>;
}

impl<T: SnapshotRepository + ?Sized> SnapshotRepository for &T {
    fn slot_key(&self) -> &str {
        (**self).slot_key()
    }

    fn read_slot(&self) -> RepoResult<Option<String>> {
        (**self).read_slot()
    }

    fn write_slot(&self, payload: &str) -> RepoResult<()> {
        (**self).write_slot(payload)
    }
}

/// SQLite-backed slot stored as one row of `snapshot_slots`.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
    slot_key: String,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Binds a repository to `slot_key` on a migrated connection.
    ///
    /// Fails when the key is blank or the connection has not been migrated.
    pub fn try_new(conn: &'conn Connection, slot_key: impl Into<String>) -> RepoResult<Self> {
        let slot_key = slot_key.into().trim().to_string();
        if slot_key.is_empty() {
            return Err(RepoError::InvalidData(
                "snapshot slot key must not be blank".to_string(),
            ));
        }
        ensure_connection_ready(conn)?;
        Ok(Self { conn, slot_key })
    }

    /// Last write time of the slot in epoch milliseconds.
    pub fn updated_at(&self) -> RepoResult<Option<i64>> {
        let updated_at = self
            .conn
            .query_row(
                "SELECT updated_at FROM snapshot_slots WHERE slot_key = ?1;",
                [self.slot_key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated_at)
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn read_slot(&self) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshot_slots WHERE slot_key = ?1;",
                [self.slot_key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&self, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.slot_key.as_str(), payload],
        )?;
        debug!(
            "event=slot_write module=repo status=ok backend=sqlite bytes={}",
            payload.len()
        );
        Ok(())
    }
}

/// In-process slot for tests and hosts without durable storage.
///
/// Counts writes and can be switched into a failing mode to exercise
/// best-effort persistence paths.
#[derive(Debug, Default)]
pub struct MemorySnapshotRepository {
    slot_key: String,
    payload: RefCell<Option<String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemorySnapshotRepository {
    pub fn new(slot_key: impl Into<String>) -> Self {
        Self {
            slot_key: slot_key.into(),
            ..Self::default()
        }
    }

    /// Creates a slot pre-filled with `payload`.
    pub fn with_payload(slot_key: impl Into<String>, payload: impl Into<String>) -> Self {
        let repo = Self::new(slot_key);
        repo.payload.replace(Some(payload.into()));
        repo
    }

    /// Current raw payload.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Makes subsequent writes fail with `RepoError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn read_slot(&self) -> RepoResult<Option<String>> {
        Ok(self.payload())
    }

    fn write_slot(&self, payload: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable("writes disabled".to_string()));
        }
        self.payload.replace(Some(payload.to_string()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type = 'table' AND name = 'snapshot_slots'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::InvalidData(
            "table `snapshot_slots` is missing; open the database through db::open_db".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySnapshotRepository, RepoError, SnapshotRepository};

    #[test]
    fn memory_slot_counts_writes_and_can_fail() {
        let repo = MemorySnapshotRepository::new("slot");
        assert_eq!(repo.read_slot().unwrap(), None);

        repo.write_slot("{}").unwrap();
        assert_eq!(repo.write_count(), 1);
        assert_eq!(repo.payload().as_deref(), Some("{}"));

        repo.set_fail_writes(true);
        let err = repo.write_slot("[]").unwrap_err();
        assert!(matches!(err, RepoError::Unavailable(_)));
        assert_eq!(repo.payload().as_deref(), Some("{}"));
        assert_eq!(repo.write_count(), 1);
    }
}
