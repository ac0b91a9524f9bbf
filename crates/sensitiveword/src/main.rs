//! `swfilter` - CLI for sensitiveword
//!
//! This binary checks text against the configured sensitive word list and
//! manages the word and excluded symbol stores.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sensitiveword::cli::{Cli, Command, ConfigCommand, SymbolsCommand, WordsCommand};
use sensitiveword::{init_logging, Config, FilterService};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Config(cmd) => handle_config(cli.config, cmd),
        Command::Check(cmd) => handle_check(&open_service(cli.config)?, &cmd.text),
        Command::Words(cmd) => {
            handle_words(&open_service(cli.config)?, cmd)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Symbols(cmd) => {
            handle_symbols(&open_service(cli.config)?, cmd)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Stats(cmd) => {
            handle_stats(&open_service(cli.config)?, cmd.json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_service(
    config_path: Option<PathBuf>,
) -> Result<FilterService, Box<dyn std::error::Error>> {
    let config = Config::load_from(config_path)?;
    let service = FilterService::new();
    service.initialize(&config)?;
    Ok(service)
}

fn handle_check(
    service: &FilterService,
    text: &str,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match service.apply(text) {
        Ok(()) => {
            println!("clean");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_sensitive_word() => {
            println!("sensitive words found");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_words(
    service: &FilterService,
    cmd: WordsCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        WordsCommand::List { json } => {
            let words = service.query_words()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&words)?);
            } else {
                for word in words {
                    println!("{word}");
                }
            }
        }
        WordsCommand::Add { words } => {
            service.add_words(&words)?;
            println!("Added {} word(s).", words.len());
        }
        WordsCommand::Remove { words } => {
            service.remove_words(&words)?;
            println!("Removed {} word(s).", words.len());
        }
        WordsCommand::Set { words } => {
            service.set_words(&words)?;
            println!("Word list replaced ({} word(s)).", words.len());
        }
    }
    Ok(())
}

fn handle_symbols(
    service: &FilterService,
    cmd: SymbolsCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SymbolsCommand::List { json } => {
            if json {
                let symbols = service.manager()?.query_excluded_symbols()?;
                println!("{}", serde_json::to_string_pretty(&symbols)?);
            } else {
                println!("{}", service.query_excluded_symbols()?);
            }
        }
        SymbolsCommand::Add { symbol } => {
            service.add_excluded_symbol(&symbol)?;
            println!("Added excluded symbol \"{symbol}\".");
        }
        SymbolsCommand::Remove { symbol } => {
            service.remove_excluded_symbol(&symbol)?;
            println!("Removed excluded symbol \"{symbol}\".");
        }
        SymbolsCommand::Set { symbol } => {
            service.set_excluded_symbol(&symbol)?;
            println!("Excluded symbols replaced with \"{symbol}\".");
        }
    }
    Ok(())
}

fn handle_stats(service: &FilterService, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stats = service.stats()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("swfilter stats");
        println!("--------------");
        println!("Words:            {}", stats.words);
        println!("Excluded symbols: {}", stats.excluded_symbols);
        println!("Excluded chars:   {}", stats.excluded_chars);
        println!("Automaton states: {}", stats.states);
    }
    Ok(())
}

fn handle_config(
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                println!("Configuration error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration is valid.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Store]");
    println!("  Kind:               {}", config.store.kind);
    match config.store_dir() {
        Some(dir) => println!("  Directory:          {}", dir.display()),
        None => println!("  Directory:          (none)"),
    }
    println!("  Words name:         {}", config.store.words_name);
    println!(
        "  Symbols name:       {}",
        config.store.excluded_symbols_name
    );
    println!();
    println!("[Filter]");
    println!("  Initial words:      {}", config.filter.words.len());
    println!(
        "  Initial symbols:    {}",
        config.filter.excluded_symbols.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &std::path::Path, contents: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_validate_reports_failure_exit_code() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "[store]\nwords_name = \"\"\n");

        let code = handle_config(Some(path), ConfigCommand::Validate { file: None }).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_validate_accepts_good_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "[filter]\nwords = [\"bad\"]\n");

        let code = handle_config(None, ConfigCommand::Validate { file: Some(path) }).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_path_does_not_load_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "not = [valid");

        let code = handle_config(Some(path), ConfigCommand::Path).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_show_propagates_load_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "not = [valid");

        assert!(handle_config(Some(path), ConfigCommand::Show { json: true }).is_err());
    }
}
