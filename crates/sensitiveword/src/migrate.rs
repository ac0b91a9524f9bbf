//! One-time migration of legacy flat-file word lists.
//!
//! Older deployments kept each list as a single file under the store
//! directory, entries joined by `|`. The durable store now lives in a
//! directory of the same name, so a legacy file has to make way for it.
//! Migration runs in three steps and never discards a list before a store
//! holds it:
//!
//! 1. [`read_legacy`] reads both lists without changing anything on disk.
//! 2. [`LegacyLists::stage`] moves each file aside to `<name>.legacy` and
//!    creates the store directory in its place.
//! 3. Once both stores are seeded, [`LegacyLists::finish`] deletes the staged
//!    copies.
//!
//! A staged copy left behind by an interrupted startup is read again on the
//! next one. The memory store only performs step 1: its entries do not survive
//! a restart, so the legacy files are left where they are.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// Separator between entries in a legacy list file.
pub const LEGACY_DELIMITER: &str = "|";

/// Extension appended to a legacy file while its entries are being migrated.
pub const STAGED_EXTENSION: &str = "legacy";

/// Entries recovered from legacy files, plus where each store now lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyLists {
    /// Sensitive words read from the legacy word file.
    pub words: Vec<String>,
    /// Symbols read from the legacy exclusion file.
    pub excluded_symbols: Vec<String>,
    /// Directory for the sensitive word store.
    pub words_dir: PathBuf,
    /// Directory for the excluded symbol store.
    pub excluded_symbols_dir: PathBuf,
}

/// Read both legacy lists found under `dir`.
///
/// Staged copies from an interrupted migration are included. Invalid UTF-8 is
/// replaced rather than rejected.
///
/// # Errors
///
/// Returns an error if a legacy file exists but cannot be read.
pub fn read_legacy(config: &Config, dir: &Path) -> Result<LegacyLists> {
    let words_dir = config.words_path(dir);
    let excluded_symbols_dir = config.excluded_symbols_path(dir);

    let words = read_list(&words_dir)?;
    let excluded_symbols = read_list(&excluded_symbols_dir)?;

    if !words.is_empty() || !excluded_symbols.is_empty() {
        info!(
            words = words.len(),
            excluded_symbols = excluded_symbols.len(),
            "Found legacy lists under {}",
            dir.display()
        );
    }

    Ok(LegacyLists {
        words,
        excluded_symbols,
        words_dir,
        excluded_symbols_dir,
    })
}

impl LegacyLists {
    /// Move each legacy file aside and create the store directories.
    ///
    /// The staged copy holds every entry read for that list, including any
    /// left over from an earlier staged copy.
    ///
    /// # Errors
    ///
    /// Returns an error if a legacy file cannot be moved aside. Nothing is
    /// lost in that case: the original file is only removed once its staged
    /// copy has been written.
    pub fn stage(&self) -> Result<()> {
        stage_list(&self.words_dir, &self.words)?;
        stage_list(&self.excluded_symbols_dir, &self.excluded_symbols)
    }

    /// Delete the staged copies once the stores hold their entries.
    ///
    /// Failures are logged; a copy left behind is merged again on the next
    /// startup, which is harmless since store writes are idempotent.
    pub fn finish(&self) {
        for dir in [&self.words_dir, &self.excluded_symbols_dir] {
            let staged = staged_path(dir);
            if !staged.is_file() {
                continue;
            }
            match fs::remove_file(&staged) {
                Ok(()) => info!("Migrated legacy list {}", dir.display()),
                Err(e) => warn!("Failed to remove staged list {}: {}", staged.display(), e),
            }
        }
    }
}

/// Path a legacy file is moved to while its entries are migrated.
#[must_use]
pub fn staged_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(STAGED_EXTENSION);
    PathBuf::from(name)
}

/// Split legacy file contents into entries.
///
/// Line endings around entries are dropped, as are empty entries.
#[must_use]
pub fn parse_legacy(contents: &str) -> Vec<String> {
    contents
        .split(LEGACY_DELIMITER)
        .map(|entry| entry.trim_matches(['\r', '\n']))
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

fn read_list(path: &Path) -> Result<Vec<String>> {
    let mut entries = read_file(&staged_path(path))?;
    entries.extend(read_file(path)?);
    Ok(entries)
}

fn read_file(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let bytes = fs::read(path).map_err(|source| Error::LegacyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_legacy(&String::from_utf8_lossy(&bytes));
    debug!(count = entries.len(), "Read legacy list {}", path.display());
    Ok(entries)
}

fn stage_list(path: &Path, entries: &[String]) -> Result<()> {
    if path.is_file() {
        let staged = staged_path(path);
        let stage_err = |source| Error::LegacyStage {
            path: path.to_path_buf(),
            source,
        };

        fs::write(&staged, entries.join(LEGACY_DELIMITER)).map_err(stage_err)?;
        fs::remove_file(path).map_err(stage_err)?;
        debug!("Staged legacy list at {}", staged.display());
    }

    if let Err(e) = fs::create_dir_all(path) {
        warn!("Failed to create store directory {}: {}", path.display(), e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_lists(dir: &Path, words: &[u8], symbols: &[u8]) {
        std::fs::write(dir.join("sensitive_words"), words).unwrap();
        std::fs::write(dir.join("excluded_symbols"), symbols).unwrap();
    }

    #[test]
    fn test_parse_legacy() {
        assert_eq!(parse_legacy("bad|worse|worst"), vec!["bad", "worse", "worst"]);
    }

    #[test]
    fn test_parse_legacy_drops_empty_entries() {
        assert_eq!(parse_legacy("|bad||worse|"), vec!["bad", "worse"]);
        assert!(parse_legacy("").is_empty());
    }

    #[test]
    fn test_parse_legacy_trims_line_endings_only() {
        assert_eq!(parse_legacy("bad|worse\n"), vec!["bad", "worse"]);
        assert_eq!(parse_legacy(" |-\r\n"), vec![" ", "-"]);
    }

    #[test]
    fn test_staged_path_appends_extension() {
        assert_eq!(
            staged_path(Path::new("/data/sensitive_words")),
            PathBuf::from("/data/sensitive_words.legacy")
        );
        assert_eq!(
            staged_path(Path::new("/data/words.v1")),
            PathBuf::from("/data/words.v1.legacy")
        );
    }

    #[test]
    fn test_read_changes_nothing_on_disk() {
        let temp = tempfile::tempdir().unwrap();
        write_lists(temp.path(), b"bad|worse", b"-|*");

        let lists = read_legacy(&Config::default(), temp.path()).unwrap();

        assert_eq!(lists.words, vec!["bad", "worse"]);
        assert_eq!(lists.excluded_symbols, vec!["-", "*"]);
        assert!(lists.words_dir.is_file());
        assert!(lists.excluded_symbols_dir.is_file());
    }

    #[test]
    fn test_read_each_list_from_its_own_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("sensitive_words"), "bad").unwrap();

        let lists = read_legacy(&Config::default(), temp.path()).unwrap();

        assert_eq!(lists.words, vec!["bad"]);
        assert!(lists.excluded_symbols.is_empty());
    }

    #[test]
    fn test_read_replaces_invalid_utf8() {
        let temp = tempfile::tempdir().unwrap();
        write_lists(temp.path(), b"bad|worse", &[0xff, b'|', b'-']);

        let lists = read_legacy(&Config::default(), temp.path()).unwrap();

        assert_eq!(lists.words, vec!["bad", "worse"]);
        assert_eq!(lists.excluded_symbols, vec!["\u{fffd}", "-"]);
    }

    #[test]
    fn test_stage_and_finish() {
        let temp = tempfile::tempdir().unwrap();
        write_lists(temp.path(), b"bad|worse", b"-");

        let lists = read_legacy(&Config::default(), temp.path()).unwrap();
        lists.stage().unwrap();

        assert!(lists.words_dir.is_dir());
        assert!(lists.excluded_symbols_dir.is_dir());
        let staged = staged_path(&lists.words_dir);
        assert_eq!(std::fs::read_to_string(&staged).unwrap(), "bad|worse");

        lists.finish();
        assert!(!staged.exists());
        assert!(!staged_path(&lists.excluded_symbols_dir).exists());
    }

    #[test]
    fn test_unfinished_migration_is_read_again() {
        let temp = tempfile::tempdir().unwrap();
        write_lists(temp.path(), b"bad|worse", b"-");

        let first = read_legacy(&Config::default(), temp.path()).unwrap();
        first.stage().unwrap();

        // Stores never got seeded; the next startup sees the staged copies.
        let second = read_legacy(&Config::default(), temp.path()).unwrap();
        assert_eq!(second.words, vec!["bad", "worse"]);
        assert_eq!(second.excluded_symbols, vec!["-"]);
    }

    #[test]
    fn test_stage_merges_existing_staged_copy() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::default();
        std::fs::write(temp.path().join("sensitive_words.legacy"), "old").unwrap();
        std::fs::write(temp.path().join("sensitive_words"), "new").unwrap();

        let lists = read_legacy(&config, temp.path()).unwrap();
        assert_eq!(lists.words, vec!["old", "new"]);
        lists.stage().unwrap();

        let staged = std::fs::read_to_string(staged_path(&lists.words_dir)).unwrap();
        assert_eq!(staged, "old|new");
    }

    #[test]
    fn test_stage_creates_missing_directories() {
        let temp = tempfile::tempdir().unwrap();

        let lists = read_legacy(&Config::default(), temp.path()).unwrap();
        assert!(lists.words.is_empty());
        assert!(lists.excluded_symbols.is_empty());

        lists.stage().unwrap();
        assert!(lists.words_dir.is_dir());
        assert!(lists.excluded_symbols_dir.is_dir());
    }

    #[test]
    fn test_existing_store_directories_are_left_alone() {
        let temp = tempfile::tempdir().unwrap();
        let words_dir = temp.path().join("sensitive_words");
        std::fs::create_dir_all(&words_dir).unwrap();
        std::fs::write(words_dir.join("store.db"), b"").unwrap();

        let lists = read_legacy(&Config::default(), temp.path()).unwrap();
        lists.stage().unwrap();
        lists.finish();

        assert!(lists.words.is_empty());
        assert!(words_dir.join("store.db").exists());
    }

    #[test]
    fn test_migration_runs_once() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::default();
        std::fs::write(temp.path().join("sensitive_words"), "bad").unwrap();

        let first = read_legacy(&config, temp.path()).unwrap();
        first.stage().unwrap();
        first.finish();
        let second = read_legacy(&config, temp.path()).unwrap();

        assert_eq!(first.words, vec!["bad"]);
        assert!(second.words.is_empty());
    }
}
