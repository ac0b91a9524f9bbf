//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Text to scan for sensitive words
    pub text: String,
}

/// Sensitive word management commands.
#[derive(Debug, Subcommand)]
pub enum WordsCommand {
    /// List all sensitive words
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add sensitive words
    Add {
        /// Words to add
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Remove sensitive words
    Remove {
        /// Words to remove
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Replace all sensitive words
    Set {
        /// The new word list (empty clears all words)
        words: Vec<String>,
    },
}

/// Excluded symbol management commands.
#[derive(Debug, Subcommand)]
pub enum SymbolsCommand {
    /// List excluded symbols
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add an excluded symbol
    Add {
        /// Symbol whose characters are skipped while scanning
        symbol: String,
    },

    /// Remove an excluded symbol
    Remove {
        /// Symbol to remove
        symbol: String,
    },

    /// Replace all excluded symbols with one symbol
    Set {
        /// The new symbol
        symbol: String,
    },
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
