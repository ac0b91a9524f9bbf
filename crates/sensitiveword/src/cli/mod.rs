//! Command-line interface for sensitiveword.
//!
//! This module provides the CLI structure for the `swfilter` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{CheckCommand, ConfigCommand, StatsCommand, SymbolsCommand, WordsCommand};

/// swfilter - Check text against a sensitive word list
///
/// Scans text for forbidden words, skipping declared separator symbols, and
/// manages the word and symbol stores.
#[derive(Debug, Parser)]
#[command(name = "swfilter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check text for sensitive words (exit code 1 on a match)
    Check(CheckCommand),

    /// Manage sensitive words
    #[command(subcommand)]
    Words(WordsCommand),

    /// Manage excluded symbols
    #[command(subcommand)]
    Symbols(SymbolsCommand),

    /// Show filter statistics
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Stats(StatsCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "swfilter");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["swfilter", "check", "some text"]).unwrap();
        match cli.command {
            Command::Check(cmd) => assert_eq!(cmd.text, "some text"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_words_add() {
        let cli = Cli::try_parse_from(["swfilter", "words", "add", "bad", "worse"]).unwrap();
        match cli.command {
            Command::Words(WordsCommand::Add { words }) => {
                assert_eq!(words, vec!["bad", "worse"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_words_add_requires_words() {
        assert!(Cli::try_parse_from(["swfilter", "words", "add"]).is_err());
    }

    #[test]
    fn test_parse_words_set_allows_empty() {
        let cli = Cli::try_parse_from(["swfilter", "words", "set"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Words(WordsCommand::Set { ref words }) if words.is_empty()
        ));
    }

    #[test]
    fn test_parse_symbols_add() {
        let cli = Cli::try_parse_from(["swfilter", "symbols", "add", "-"]);
        // A bare "-" is accepted as a positional value.
        let cli = cli.unwrap();
        assert!(matches!(
            cli.command,
            Command::Symbols(SymbolsCommand::Add { ref symbol }) if symbol == "-"
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["swfilter", "-c", "/custom/config.toml", "stats"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
