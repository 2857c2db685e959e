// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::UiMode;

/// Command-line arguments for `dojowatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dojowatch",
    version,
    about = "Watch a directory and run commands (and auto-commit) on every change.",
    long_about = None
)]
pub struct CliArgs {
    /// Watch DIRECTORY (default: current working directory).
    #[arg(short = 'd', long, value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Run COMMAND when there is a change. May be given many times,
    /// e.g. `-c clear -c "cargo test"`.
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Ignore files whose name contains PATTERN (plain substring, not a glob).
    /// May be given many times, e.g. `-p .txt -p .swp`.
    #[arg(short = 'p', long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Length of one pairing round in seconds.
    #[arg(short = 'r', long, value_name = "SECS")]
    pub round_time: Option<u64>,

    /// Seconds between two samples of the directory tree.
    #[arg(short = 'i', long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Do not run `git add . ; git commit` before the commands.
    #[arg(long)]
    pub no_commit: bool,

    /// Presentation front-end.
    #[arg(long, value_enum, value_name = "UI")]
    pub ui: Option<UiMode>,

    /// Optional TOML file with a `[watch]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOJOWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Write logs to PATH instead of stderr (the TUI discards logs otherwise).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Resolve and print the configuration, but don't watch or run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Commands given positionally are appended after `--command` ones.
    /// Options may appear before, between or after them.
    #[arg(value_name = "COMMAND")]
    pub positional_commands: Vec<String>,
}

impl CliArgs {
    /// All commands in the order they will run.
    pub fn all_commands(&self) -> Vec<String> {
        self.commands
            .iter()
            .chain(self.positional_commands.iter())
            .cloned()
            .collect()
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
