//! Key-value slot repository contracts and implementations.
//!
//! # Responsibility
//! - Read and write whole string values under fixed keys.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Reads and writes are whole-value; there is no partial access.
//! - A write overwrites any prior value under the same key.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the serialized habit collection.
pub const HABITS_SLOT_KEY: &str = "habits";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Backing schema is missing a table the repository depends on.
    SchemaNotReady(&'static str),
    /// Backend refused the operation for a reason other than SQL failure.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::SchemaNotReady(table) => write!(f, "required table `{table}` is missing"),
            Self::Unavailable(message) => write!(f, "slot storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::SchemaNotReady(_) | Self::Unavailable(_) => None,
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

/// Repository interface for whole-value slot access.
pub trait SlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed slot repository.
///
/// Owns its connection so a store built on top of it can live for the whole
/// process.
pub struct SqliteSlotRepository {
    conn: Connection,
}

impl SqliteSlotRepository {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `SchemaNotReady` when the `kv_slots` table does not exist, which
    ///   means the connection was not opened through `db::open_db*`.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::SchemaNotReady("kv_slots"));
        }
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotRepository for SqliteSlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local slot repository with no durable backing.
#[derive(Debug, Default)]
pub struct InMemorySlotRepository {
    slots: RefCell<HashMap<String, String>>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with one slot value.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let repo = Self::new();
        repo.slots.borrow_mut().insert(key.into(), value.into());
        repo
    }
}

impl SlotRepository for InMemorySlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write_slot(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemorySlotRepository, SlotRepository, SqliteSlotRepository, HABITS_SLOT_KEY};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn sqlite_write_overwrites_prior_value() {
        let repo = SqliteSlotRepository::try_new(open_db_in_memory().unwrap()).unwrap();
        assert_eq!(repo.read_slot(HABITS_SLOT_KEY).unwrap(), None);

        repo.write_slot(HABITS_SLOT_KEY, "[]").unwrap();
        repo.write_slot(HABITS_SLOT_KEY, "[1]").unwrap();

        assert_eq!(
            repo.read_slot(HABITS_SLOT_KEY).unwrap().as_deref(),
            Some("[1]")
        );
        let rows: i64 = repo
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn sqlite_repo_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteSlotRepository::try_new(conn)
            .err()
            .expect("bare connection must be rejected");
        assert!(err.to_string().contains("kv_slots"));
    }

    #[test]
    fn in_memory_repo_keeps_keys_independent() {
        let repo = InMemorySlotRepository::with_slot("other", "x");
        repo.write_slot(HABITS_SLOT_KEY, "[]").unwrap();

        assert_eq!(repo.read_slot("other").unwrap().as_deref(), Some("x"));
        assert_eq!(repo.read_slot(HABITS_SLOT_KEY).unwrap().as_deref(), Some("[]"));
    }
}
