//! Durable word store backed by `SQLite`.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use super::migrations;
use super::schema::{DELETE_ENTRY, INSERT_ENTRY, SELECT_ENTRIES};
use super::{Result, StoreError, StoreKind, WordStore};

/// Database file name inside a store directory.
pub const STORE_FILE_NAME: &str = "store.db";

/// A [`WordStore`] persisted to a `SQLite` database.
///
/// Every batch write or remove runs in a single transaction, so a failed call
/// leaves the database exactly as it was.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store database inside `dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created, or
    /// schema initialization fails.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Self::open(dir.join(STORE_FILE_NAME))
    }

    /// Open or create a store database at the given file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        debug!("Opening word store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| StoreError::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Word store opened at {}", path.display());
        Ok(Self { conn })
    }

    /// Create an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    fn apply_each(&mut self, sql: &str, words: &[String]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut affected = 0;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for word in words {
                affected += stmt.execute([word.as_str()])?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }
}

impl WordStore for SqliteStore {
    fn write(&mut self, words: &[String]) -> Result<()> {
        let inserted = self.apply_each(INSERT_ENTRY, words)?;
        debug!(requested = words.len(), inserted, "Wrote entries to word store");
        Ok(())
    }

    fn remove(&mut self, words: &[String]) -> Result<()> {
        let removed = self.apply_each(DELETE_ENTRY, words)?;
        debug!(requested = words.len(), removed, "Removed entries from word store");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(SELECT_ENTRIES)?;
        let words = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(words)
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Durable
    }
}
