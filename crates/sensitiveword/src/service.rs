//! Public facade over the filter.
//!
//! A [`FilterService`] starts out [`InitState::Uninitialized`] and must be
//! initialized once before use. The first successful configuration wins for the
//! lifetime of the service; later attempts are reported as
//! [`Error::AlreadyInitialized`] rather than silently ignored.
//!
//! # Example
//!
//! ```
//! use sensitiveword::{Config, FilterService};
//!
//! let service = FilterService::new();
//! service.initialize(&Config::default()).unwrap();
//!
//! service.add_words(&["bad"]).unwrap();
//! service.add_excluded_symbol("-").unwrap();
//!
//! assert!(service.apply("b-a-d").unwrap_err().is_sensitive_word());
//! assert!(service.apply("good").is_ok());
//! ```

use std::fmt;
use std::sync::{Mutex, OnceLock};

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::exclusion::join_symbols;
use crate::manager::{FilterManager, FilterStats};

/// Lifecycle of a [`FilterService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// `initialize` has not been called yet.
    Uninitialized,
    /// `initialize` is building the filter.
    Initializing,
    /// The filter is ready for use.
    Ready,
    /// The last initialization attempt failed; it may be retried.
    Failed,
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Sensitive word filter with init-once semantics.
#[derive(Debug)]
pub struct FilterService {
    state: Mutex<InitState>,
    manager: OnceLock<FilterManager>,
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterService {
    /// Create an uninitialized service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InitState::Uninitialized),
            manager: OnceLock::new(),
        }
    }

    /// Process-wide service instance.
    ///
    /// Prefer constructing a service and passing it around; this exists for
    /// callers that have no way to receive a handle.
    #[must_use]
    pub fn global() -> &'static FilterService {
        static GLOBAL: OnceLock<FilterService> = OnceLock::new();
        GLOBAL.get_or_init(FilterService::new)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> InitState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_state(&self, next: InitState) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::internal("service state lock poisoned"))?;
        *state = next;
        Ok(())
    }

    /// Build the filter from `config`.
    ///
    /// Allowed from `Uninitialized` or `Failed`. The filter is built without
    /// holding the state lock, so concurrent callers observe `Initializing`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyInitialized`] if the service is ready or being
    /// initialized, and [`Error::Initialization`] if the filter cannot be
    /// built; the service is then `Failed` and may be initialized again.
    pub fn initialize(&self, config: &Config) -> Result<()> {
        {
            let mut state = self
                .state
                .lock()
                .map_err(|_| Error::internal("service state lock poisoned"))?;
            let current = *state;
            match current {
                InitState::Ready | InitState::Initializing => {
                    warn!(state = %current, "Ignoring repeated filter initialization");
                    return Err(Error::AlreadyInitialized);
                }
                InitState::Uninitialized | InitState::Failed => {
                    *state = InitState::Initializing;
                }
            }
        }

        info!(store = %config.store.kind, "Initializing sensitive word filter");
        match FilterManager::open(config) {
            Ok(manager) => {
                let stored = self.manager.set(manager);
                self.set_state(InitState::Ready)?;
                if stored.is_err() {
                    return Err(Error::internal("filter manager set twice"));
                }
                info!("Sensitive word filter ready");
                Ok(())
            }
            Err(source) => {
                self.set_state(InitState::Failed)?;
                error!(error = %source, "Sensitive word filter failed to initialize");
                Err(Error::initialization(source))
            }
        }
    }

    /// The underlying manager, once ready.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before a successful `initialize`.
    pub fn manager(&self) -> Result<&FilterManager> {
        self.manager.get().ok_or(Error::NotInitialized)
    }

    /// Check `text` for sensitive words.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SensitiveWord`] if `text` contains an active sensitive
    /// word once excluded symbols are skipped. This is the expected outcome
    /// for flagged text, not a failure of the filter.
    pub fn apply(&self, text: &str) -> Result<()> {
        if self.manager()?.scan(text)?.is_match() {
            return Err(Error::SensitiveWord);
        }
        Ok(())
    }

    /// Add sensitive words.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready or the store write fails.
    pub fn add_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        self.manager()?.add_words(words)
    }

    /// Remove sensitive words.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready or the store removal fails.
    pub fn remove_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        self.manager()?.remove_words(words)
    }

    /// Replace every sensitive word.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready, or see
    /// [`FilterManager::set_words`].
    pub fn set_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        self.manager()?.set_words(words)
    }

    /// List every sensitive word.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready or the store read fails.
    pub fn query_words(&self) -> Result<Vec<String>> {
        self.manager()?.query_words()
    }

    /// Add one excluded symbol; each of its characters is skipped in scans.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready or the store write fails.
    pub fn add_excluded_symbol(&self, symbol: &str) -> Result<()> {
        self.manager()?.add_excluded_symbols(&[symbol])
    }

    /// Remove one excluded symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready or the store removal fails.
    pub fn remove_excluded_symbol(&self, symbol: &str) -> Result<()> {
        self.manager()?.remove_excluded_symbols(&[symbol])
    }

    /// Replace every excluded symbol with `symbol`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready, or see
    /// [`FilterManager::set_excluded_symbols`].
    pub fn set_excluded_symbol(&self, symbol: &str) -> Result<()> {
        self.manager()?.set_excluded_symbols(&[symbol])
    }

    /// Every excluded symbol joined by `|`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready or the store read fails.
    pub fn query_excluded_symbols(&self) -> Result<String> {
        Ok(join_symbols(&self.manager()?.query_excluded_symbols()?))
    }

    /// Current sizes of the filter state.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is not ready.
    pub fn stats(&self) -> Result<FilterStats> {
        self.manager()?.stats()
    }
}

/// A filter that passes clean input through unchanged.
pub trait SensitiveFilter {
    /// Return `input` as-is if it holds no sensitive word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SensitiveWord`] when `input` is flagged, or whatever
    /// error prevented the check.
    fn filter(&self, input: &str) -> Result<String>;
}

impl SensitiveFilter for FilterService {
    fn filter(&self, input: &str) -> Result<String> {
        self.apply(input)?;
        Ok(input.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use crate::store::StoreKind;

    fn ready_service() -> FilterService {
        let service = FilterService::new();
        service.initialize(&Config::default()).unwrap();
        service
    }

    #[test]
    fn test_filter_passes_clean_input_through() {
        let service = ready_service();
        service.add_words(&["bad"]).unwrap();
        service.add_excluded_symbol("*").unwrap();

        assert_eq!(service.filter("all good").unwrap(), "all good");
        assert!(service.filter("b*a*d").unwrap_err().is_sensitive_word());
        assert!(matches!(
            FilterService::new().filter("x"),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn test_filter_through_trait_object() {
        let service = ready_service();
        service.add_words(&["bad"]).unwrap();
        let filter: &dyn SensitiveFilter = &service;

        assert_eq!(filter.filter("").unwrap(), "");
        assert!(filter.filter("too bad").is_err());
    }

    #[test]
    fn test_new_is_uninitialized() {
        let service = FilterService::new();
        assert_eq!(service.state(), InitState::Uninitialized);
    }

    #[test]
    fn test_operations_before_init_fail() {
        let service = FilterService::new();
        assert!(matches!(service.apply("x"), Err(Error::NotInitialized)));
        assert!(matches!(
            service.add_words(&["x"]),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(service.query_words(), Err(Error::NotInitialized)));
        assert!(matches!(
            service.query_excluded_symbols(),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn test_initialize_moves_to_ready() {
        let service = ready_service();
        assert_eq!(service.state(), InitState::Ready);
    }

    #[test]
    fn test_double_initialize_is_reported_and_first_config_wins() {
        let service = FilterService::new();
        let mut first = Config::default();
        first.filter.words = vec!["first".to_string()];
        let mut second = Config::default();
        second.filter.words = vec!["second".to_string()];

        service.initialize(&first).unwrap();
        let err = service.initialize(&second).unwrap_err();

        assert!(err.is_already_initialized());
        assert_eq!(service.state(), InitState::Ready);
        assert_eq!(service.query_words().unwrap(), vec!["first"]);
    }

    #[test]
    fn test_failed_initialize_can_be_retried() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "file where a directory belongs").unwrap();

        let mut bad = Config::default();
        bad.store.kind = StoreKind::Durable;
        bad.store.path = Some(blocker);

        let service = FilterService::new();
        let err = service.initialize(&bad).unwrap_err();
        assert!(matches!(err, Error::Initialization { .. }));
        assert_eq!(service.state(), InitState::Failed);
        assert!(matches!(service.apply("x"), Err(Error::NotInitialized)));

        service.initialize(&Config::default()).unwrap();
        assert_eq!(service.state(), InitState::Ready);
    }

    #[test]
    fn test_apply_flags_added_words() {
        let service = ready_service();
        service.add_words(&["bad"]).unwrap();

        assert!(service.apply("this is bad").unwrap_err().is_sensitive_word());
        assert!(service.apply("this is fine").is_ok());
    }

    #[test]
    fn test_apply_on_empty_word_set() {
        let service = ready_service();
        assert!(service.apply("").is_ok());
        assert!(service.apply("anything at all").is_ok());
    }

    #[test]
    fn test_remove_words() {
        let service = ready_service();
        service.add_words(&["bad", "worse"]).unwrap();
        service.remove_words(&["bad"]).unwrap();

        assert!(service.apply("bad").is_ok());
        assert!(service.apply("worse").is_err());
    }

    #[test]
    fn test_set_words_is_exact() {
        let service = ready_service();
        service.add_words(&["old"]).unwrap();
        service.set_words(&["a", "b"]).unwrap();

        let words: BTreeSet<String> = service.query_words().unwrap().into_iter().collect();
        let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_add_words_idempotent() {
        let service = ready_service();
        service.add_words(&["x", "x"]).unwrap();

        let words = service.query_words().unwrap();
        assert_eq!(words.iter().filter(|w| *w == "x").count(), 1);
    }

    #[test]
    fn test_exclusion_round_trip() {
        let service = ready_service();
        service.add_words(&["bad"]).unwrap();
        service.add_excluded_symbol("-").unwrap();
        assert!(service.apply("b-a-d").unwrap_err().is_sensitive_word());

        service.remove_excluded_symbol("-").unwrap();
        assert!(service.apply("b-a-d").is_ok());
    }

    #[test]
    fn test_excluded_symbols_query_and_set() {
        let service = ready_service();
        service.add_excluded_symbol("-").unwrap();
        service.add_excluded_symbol("*").unwrap();
        assert_eq!(service.query_excluded_symbols().unwrap(), "*|-");

        service.set_excluded_symbol("_").unwrap();
        assert_eq!(service.query_excluded_symbols().unwrap(), "_");
    }

    #[test]
    fn test_stats() {
        let service = ready_service();
        service.add_words(&["bad"]).unwrap();
        let stats = service.stats().unwrap();
        assert_eq!(stats.words, 1);
        assert_eq!(stats.states, 4);
    }

    #[test]
    fn test_concurrent_apply() {
        let service = Arc::new(ready_service());
        service.add_words(&["bad"]).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(service.apply("so bad").is_err());
                        assert!(service.apply("so good").is_ok());
                    }
                    service.add_words(&[format!("word{i}")]).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert_eq!(service.stats().unwrap().words, 9);
    }

    #[test]
    fn test_global_is_shared() {
        let a = FilterService::global();
        let b = FilterService::global();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_init_state_display() {
        assert_eq!(InitState::Uninitialized.to_string(), "uninitialized");
        assert_eq!(InitState::Initializing.to_string(), "initializing");
        assert_eq!(InitState::Ready.to_string(), "ready");
        assert_eq!(InitState::Failed.to_string(), "failed");
    }
}
