//! In-memory word store.

use std::collections::BTreeSet;

use super::{Result, StoreKind, WordStore};

/// A [`WordStore`] kept entirely in memory.
///
/// Entries are held in a `BTreeSet`, so `read_all` returns them sorted and
/// duplicates collapse on insert.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    words: BTreeSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given entries.
    #[must_use]
    pub fn with_words(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }
}

impl WordStore for MemoryStore {
    fn write(&mut self, words: &[String]) -> Result<()> {
        self.words.extend(words.iter().cloned());
        Ok(())
    }

    fn remove(&mut self, words: &[String]) -> Result<()> {
        for word in words {
            self.words.remove(word);
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<String>> {
        Ok(self.words.iter().cloned().collect())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }
}
