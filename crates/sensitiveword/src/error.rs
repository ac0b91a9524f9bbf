//! Error types for sensitiveword.
//!
//! This module defines the top-level error type returned by the filter service,
//! separating store failures, the expected "sensitive word present" signal, and
//! lifecycle errors so callers can react to each one differently.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

/// The main error type for sensitiveword operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Filter Outcomes ===
    /// The scanned text contains at least one active sensitive word.
    ///
    /// This is a normal outcome of [`FilterService::apply`](crate::FilterService::apply),
    /// not a system fault.
    #[error("there are sensitive words")]
    SensitiveWord,

    // === Store Errors ===
    /// The backing word store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A reset removed the previous entries but failed to write the new ones.
    ///
    /// The affected set is empty until the next successful write.
    #[error("reset of {target} partially applied, previous entries were removed: {source}")]
    PartialReset {
        /// Which set was being reset (`"words"` or `"excluded symbols"`).
        target: &'static str,
        /// The store failure that interrupted the reset.
        #[source]
        source: StoreError,
    },

    // === Lifecycle Errors ===
    /// The filter could not be constructed at startup.
    #[error("failed to initialize filter: {source}")]
    Initialization {
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    /// The filter has already been initialized (or is initializing).
    #[error("filter already initialized")]
    AlreadyInitialized,

    /// An operation was attempted before the filter was initialized.
    #[error("filter is not initialized")]
    NotInitialized,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to read a legacy word list file.
    #[error("failed to read legacy list {path}: {source}")]
    LegacyRead {
        /// Path of the legacy file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a legacy word list aside before migrating it.
    #[error("failed to stage legacy list {path}: {source}")]
    LegacyStage {
        /// Path of the legacy file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for sensitiveword operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap an error raised while building the filter.
    #[must_use]
    pub fn initialization(source: Error) -> Self {
        Self::Initialization {
            source: Box::new(source),
        }
    }

    /// Check if this error is the "sensitive word present" signal.
    #[must_use]
    pub fn is_sensitive_word(&self) -> bool {
        matches!(self, Self::SensitiveWord)
    }

    /// Check if this error reports an interrupted reset.
    #[must_use]
    pub fn is_partial_reset(&self) -> bool {
        matches!(self, Self::PartialReset { .. })
    }

    /// Check if this error reports a repeated initialization.
    #[must_use]
    pub fn is_already_initialized(&self) -> bool {
        matches!(self, Self::AlreadyInitialized)
    }
}
