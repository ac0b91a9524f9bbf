//! `sensitiveword` - a sensitive word filter for content-safety gates
//!
//! This library decides whether text contains any of a runtime-mutable set of
//! forbidden words. Matching runs in one linear pass over the text using an
//! Aho-Corasick style automaton, and declared separator symbols are skipped so
//! that `"b-a-d"` is still caught by `"bad"`.
//!
//! Words and excluded symbols live in a [`store::WordStore`], either in memory
//! or in a durable `SQLite` database, and every change is written to the store
//! before the matcher is rebuilt.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod automaton;
pub mod cli;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod logging;
pub mod manager;
pub mod migrate;
pub mod service;
pub mod store;

pub use automaton::Automaton;
pub use config::Config;
pub use error::{Error, Result};
pub use exclusion::ExclusionSet;
pub use logging::init_logging;
pub use manager::{FilterManager, FilterStats, Verdict};
pub use service::{FilterService, InitState, SensitiveFilter};
pub use store::{StoreError, StoreKind, WordStore};
