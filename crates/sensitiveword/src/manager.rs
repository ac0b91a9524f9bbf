//! Coordination of word sets, stores, and the matching automaton.
//!
//! [`FilterManager`] owns the word store, the excluded symbol store, their
//! in-memory mirrors, and the [`Automaton`] built from the words. A single
//! mutex guards all of them, so a scan never observes a half-applied mutation.
//!
//! Every mutation writes to its store first and only then updates memory. A
//! failed store call leaves the in-memory state untouched, which keeps the
//! matching state identical to what a restart would load.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::automaton::Automaton;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionSet;
use crate::migrate::read_legacy;
use crate::store::{open_store, StoreKind, WordStore};

/// Outcome of scanning a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No active sensitive word occurs in the text.
    Clean,
    /// At least one active sensitive word occurs in the text.
    MatchFound,
}

impl Verdict {
    /// Whether a sensitive word was found.
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, Self::MatchFound)
    }
}

/// Snapshot of the filter's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Active sensitive words.
    pub words: usize,
    /// Stored excluded symbols.
    pub excluded_symbols: usize,
    /// Distinct characters skipped during scans.
    pub excluded_chars: usize,
    /// States in the current automaton, including the root.
    pub states: usize,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Words,
    ExcludedSymbols,
}

impl Target {
    fn label(self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::ExcludedSymbols => "excluded symbols",
        }
    }
}

#[derive(Debug)]
struct Inner {
    word_store: Box<dyn WordStore>,
    symbol_store: Box<dyn WordStore>,
    words: BTreeSet<String>,
    symbols: BTreeSet<String>,
    automaton: Automaton,
    exclusions: ExclusionSet,
}

impl Inner {
    fn parts(&mut self, target: Target) -> (&mut Box<dyn WordStore>, &mut BTreeSet<String>) {
        match target {
            Target::Words => (&mut self.word_store, &mut self.words),
            Target::ExcludedSymbols => (&mut self.symbol_store, &mut self.symbols),
        }
    }

    /// Recompute whatever is derived from the target's in-memory set.
    fn refresh(&mut self, target: Target) {
        match target {
            Target::Words => {
                self.automaton = Automaton::new(&self.words);
                debug!(
                    patterns = self.automaton.pattern_count(),
                    states = self.automaton.state_count(),
                    "Rebuilt automaton"
                );
            }
            Target::ExcludedSymbols => {
                self.exclusions = ExclusionSet::from_symbols(&self.symbols);
                debug!(chars = self.exclusions.len(), "Refreshed exclusion set");
            }
        }
    }

    fn add(&mut self, target: Target, entries: Vec<String>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let (store, set) = self.parts(target);
        store.write(&entries)?;
        set.extend(entries);
        self.refresh(target);
        Ok(())
    }

    fn remove(&mut self, target: Target, entries: &[String]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let (store, set) = self.parts(target);
        store.remove(entries)?;
        for entry in entries {
            set.remove(entry);
        }
        self.refresh(target);
        Ok(())
    }

    /// Replace every entry of the target in two store steps.
    ///
    /// If the write fails after the removal succeeded, the store is left
    /// empty; memory is cleared to match and `PartialReset` is returned.
    fn reset(&mut self, target: Target, entries: Vec<String>) -> Result<()> {
        let (store, set) = self.parts(target);
        let current = store.read_all()?;
        store.remove(&current)?;
        set.clear();

        let written = store.write(&entries);
        if written.is_ok() {
            set.extend(entries);
        }
        self.refresh(target);

        written.map_err(|source| {
            error!(
                set = target.label(),
                error = %source,
                "Reset removed previous entries but failed to write new ones"
            );
            Error::PartialReset {
                target: target.label(),
                source,
            }
        })
    }
}

/// Owner of the filter state; safe to share between threads.
#[derive(Debug)]
pub struct FilterManager {
    inner: Mutex<Inner>,
}

impl FilterManager {
    /// Build a manager over existing stores, loading their current contents.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be read.
    pub fn new(word_store: Box<dyn WordStore>, symbol_store: Box<dyn WordStore>) -> Result<Self> {
        let words: BTreeSet<String> = word_store.read_all()?.into_iter().collect();
        let symbols: BTreeSet<String> = symbol_store.read_all()?.into_iter().collect();

        let mut inner = Inner {
            word_store,
            symbol_store,
            words,
            symbols,
            automaton: Automaton::empty(),
            exclusions: ExclusionSet::new(),
        };
        inner.refresh(Target::Words);
        inner.refresh(Target::ExcludedSymbols);

        info!(
            store = %inner.word_store.kind(),
            words = inner.words.len(),
            excluded_symbols = inner.symbols.len(),
            "Filter manager ready"
        );
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }

    /// Build a manager from configuration.
    ///
    /// When a store directory is configured, legacy list files found there are
    /// read and their entries seeded into the stores along with the configured
    /// ones. For the durable store the legacy files are staged first and only
    /// deleted after both stores have been opened and loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a legacy file cannot
    /// be read or staged, or a store cannot be opened, seeded, or read.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let legacy = match config.store_dir() {
            Some(dir) => Some(read_legacy(config, &dir)?),
            None => None,
        };
        let staged = legacy
            .as_ref()
            .filter(|_| config.store.kind == StoreKind::Durable);
        if let Some(lists) = staged {
            lists.stage()?;
        }

        let none: &[String] = &[];
        let (legacy_words, legacy_symbols) = legacy.as_ref().map_or((none, none), |lists| {
            (lists.words.as_slice(), lists.excluded_symbols.as_slice())
        });
        let words = normalize(legacy_words.iter().chain(&config.filter.words));
        let symbols = normalize(legacy_symbols.iter().chain(&config.filter.excluded_symbols));

        let word_store = open_store(
            config.store.kind,
            staged.map(|lists| lists.words_dir.as_path()),
            &words,
        )?;
        let symbol_store = open_store(
            config.store.kind,
            staged.map(|lists| lists.excluded_symbols_dir.as_path()),
            &symbols,
        )?;
        let manager = Self::new(word_store, symbol_store)?;

        if let Some(lists) = staged {
            lists.finish();
        }
        Ok(manager)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::internal("filter lock poisoned"))
    }

    /// Scan `text` against the active words, skipping excluded characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter lock is poisoned.
    pub fn scan(&self, text: &str) -> Result<Verdict> {
        let inner = self.lock()?;
        let found = inner
            .automaton
            .is_match(text, |c| inner.exclusions.contains(c));
        Ok(if found {
            Verdict::MatchFound
        } else {
            Verdict::Clean
        })
    }

    /// Add sensitive words. Empty entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails; nothing changes in that case.
    pub fn add_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        let words = normalize(words);
        debug!(count = words.len(), "Adding sensitive words");
        self.lock()?.add(Target::Words, words)
    }

    /// Remove sensitive words. Absent words are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store removal fails; nothing changes in that case.
    pub fn remove_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        let words = normalize(words);
        debug!(count = words.len(), "Removing sensitive words");
        self.lock()?.remove(Target::Words, &words)
    }

    /// Replace every sensitive word with `words`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if reading or removing the old words fails,
    /// and [`Error::PartialReset`] if the old words were removed but the new
    /// ones could not be written.
    pub fn set_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        let words = normalize(words);
        info!(count = words.len(), "Resetting sensitive words");
        self.lock()?.reset(Target::Words, words)
    }

    /// Read every sensitive word from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn query_words(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.word_store.read_all()?)
    }

    /// Add excluded symbols. Empty entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails; nothing changes in that case.
    pub fn add_excluded_symbols<S: AsRef<str>>(&self, symbols: &[S]) -> Result<()> {
        let symbols = normalize(symbols);
        debug!(count = symbols.len(), "Adding excluded symbols");
        self.lock()?.add(Target::ExcludedSymbols, symbols)
    }

    /// Remove excluded symbols. Absent symbols are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store removal fails; nothing changes in that case.
    pub fn remove_excluded_symbols<S: AsRef<str>>(&self, symbols: &[S]) -> Result<()> {
        let symbols = normalize(symbols);
        debug!(count = symbols.len(), "Removing excluded symbols");
        self.lock()?.remove(Target::ExcludedSymbols, &symbols)
    }

    /// Replace every excluded symbol with `symbols`.
    ///
    /// # Errors
    ///
    /// Same as [`FilterManager::set_words`].
    pub fn set_excluded_symbols<S: AsRef<str>>(&self, symbols: &[S]) -> Result<()> {
        let symbols = normalize(symbols);
        info!(count = symbols.len(), "Resetting excluded symbols");
        self.lock()?.reset(Target::ExcludedSymbols, symbols)
    }

    /// Read every excluded symbol from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn query_excluded_symbols(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.symbol_store.read_all()?)
    }

    /// Current sizes of the filter state.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter lock is poisoned.
    pub fn stats(&self) -> Result<FilterStats> {
        let inner = self.lock()?;
        Ok(FilterStats {
            words: inner.words.len(),
            excluded_symbols: inner.symbols.len(),
            excluded_chars: inner.exclusions.len(),
            states: inner.automaton.state_count(),
        })
    }
}

/// Drop empty entries and duplicates, keeping first-seen order.
fn normalize<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        if entry.is_empty() {
            debug!("Ignoring empty entry");
            continue;
        }
        if seen.insert(entry.to_string()) {
            out.push(entry.to_string());
        }
    }
    out
}
