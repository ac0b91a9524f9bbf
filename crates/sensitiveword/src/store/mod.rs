//! Backing stores for sensitive words and excluded symbols.
//!
//! A [`WordStore`] is a set of strings with batch write, batch remove, and
//! read-all. Two implementations are provided:
//!
//! - [`MemoryStore`]: an ordered in-memory set, lost at process exit.
//! - [`SqliteStore`]: a durable `SQLite` database, one file per store.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors raised by a [`WordStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open or create the database.
    #[error("failed to open store at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Failed to bring the schema up to date.
    #[error("store migration failed: {message}")]
    Migration {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to create the store directory.
    #[error("failed to create store directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The store cannot currently serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Which backend holds a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// In-memory set; contents are lost at process exit.
    #[default]
    Memory,
    /// `SQLite` file on disk.
    #[serde(alias = "sqlite", alias = "leveldb")]
    Durable,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Durable => write!(f, "durable"),
        }
    }
}

/// A set of strings with idempotent batch mutation.
///
/// Implementations must apply a whole batch or report an error; callers rely
/// on a failed call having no effect they need to mirror in memory.
pub trait WordStore: Send + fmt::Debug {
    /// Insert every entry. Entries already present are left as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn write(&mut self, words: &[String]) -> Result<()>;

    /// Delete every entry. Entries that are absent are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn remove(&mut self, words: &[String]) -> Result<()>;

    /// Read every entry in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn read_all(&self) -> Result<Vec<String>>;

    /// The backend kind of this store.
    fn kind(&self) -> StoreKind;
}

/// Open a store of the given kind, seeded with `initial` entries.
///
/// `dir` is required for [`StoreKind::Durable`] and ignored for
/// [`StoreKind::Memory`].
///
/// # Errors
///
/// Returns an error if the durable store cannot be opened or seeded.
pub fn open_store(
    kind: StoreKind,
    dir: Option<&Path>,
    initial: &[String],
) -> Result<Box<dyn WordStore>> {
    match kind {
        StoreKind::Memory => Ok(Box::new(MemoryStore::with_words(initial.iter().cloned()))),
        StoreKind::Durable => {
            let dir = dir.ok_or_else(|| {
                StoreError::Unavailable("durable store requires a directory".to_string())
            })?;
            let mut store = SqliteStore::open_dir(dir)?;
            if !initial.is_empty() {
                store.write(initial)?;
            }
            Ok(Box::new(store))
        }
    }
}
