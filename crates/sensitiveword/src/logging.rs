//! Logging setup for sensitiveword.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to tests) through [`init_logging`]. Log lines go to
//! stderr so that `swfilter` output on stdout stays machine-readable.

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target prefix of every event this crate emits.
pub const LOG_TARGET: &str = "sensitiveword";

/// How much the filter logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Startup, migrations and resets.
    #[default]
    Normal,
    /// Every mutation and automaton rebuild.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Most detailed level emitted at this verbosity.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    ///
    /// Only this crate's events pass; dependencies stay at warnings.
    #[must_use]
    pub fn directive(self) -> String {
        format!("warn,{LOG_TARGET}={}", self.level())
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `verbosity` when set. Calling this again, or after an
/// embedding application installed its own subscriber, has no effect.
///
/// # Examples
///
/// ```no_run
/// use sensitiveword::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbosity >= Verbosity::Verbose)
                .without_time(),
        )
        .try_init();
}

/// Route logs through the test harness, at warnings unless `RUST_LOG` says otherwise.
#[cfg(test)]
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
