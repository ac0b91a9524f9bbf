//! Characters ignored while scanning.
//!
//! Excluded symbols are stored as strings, but matching works on single
//! characters: every character of every stored symbol is skipped. Storing
//! `"-_"` therefore excludes both `-` and `_`.

use std::collections::HashSet;

/// Delimiter used when reporting stored symbols as a single string.
pub const SYMBOL_DELIMITER: &str = "|";

/// Set of characters treated as zero-width during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    chars: HashSet<char>,
}

impl ExclusionSet {
    /// Create an empty exclusion set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from stored symbol strings.
    #[must_use]
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        symbols
            .into_iter()
            .flat_map(|symbol| symbol.as_ref().chars().collect::<Vec<_>>())
            .collect()
    }

    /// Whether `c` is skipped during a scan.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Number of distinct excluded characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether no characters are excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl FromIterator<char> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

/// Join stored symbols for display, e.g. `"-|*"`.
#[must_use]
pub fn join_symbols(symbols: &[String]) -> String {
    symbols.join(SYMBOL_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let set = ExclusionSet::new();
        assert!(set.is_empty());
        assert!(!set.contains('-'));
    }

    #[test]
    fn test_from_symbols_flattens_characters() {
        let set = ExclusionSet::from_symbols(["-_", "*"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains('-'));
        assert!(set.contains('_'));
        assert!(set.contains('*'));
        assert!(!set.contains('a'));
    }

    #[test]
    fn test_from_symbols_deduplicates() {
        let set = ExclusionSet::from_symbols(["--", "-"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_empty_symbol_contributes_nothing() {
        let set = ExclusionSet::from_symbols([""]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_unicode_symbols() {
        let set = ExclusionSet::from_symbols(["★", "。"]);
        assert!(set.contains('★'));
        assert!(set.contains('。'));
        assert!(!set.contains('敏'));
    }

    #[test]
    fn test_join_symbols() {
        let symbols = vec!["-".to_string(), "*".to_string()];
        assert_eq!(join_symbols(&symbols), "-|*");
        assert_eq!(join_symbols(&[]), "");
    }
}
