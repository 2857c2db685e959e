// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::UiMode;

/// Default length of one pairing round.
pub const DEFAULT_ROUND_TIME_SECS: u64 = 300;

/// Default gap between two fingerprint samples.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Top-level configuration as read from an optional TOML file.
///
/// ```toml
/// [watch]
/// directory = "."
/// commands = ["clear", "cargo test"]
/// patterns = [".swp", "~"]
/// commit = true
/// poll_interval_secs = 1
/// round_time_secs = 300
/// ui = "tui"
/// ```
///
/// Every key is optional; CLI flags fill the gaps or override.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Shell commands, run in order on every change.
    #[serde(default)]
    pub commands: Vec<String>,

    /// Substring ignore patterns, matched against file names.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Whether to auto-commit before running the commands (default: true).
    #[serde(default)]
    pub commit: Option<bool>,

    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    #[serde(default)]
    pub round_time_secs: Option<u64>,

    #[serde(default)]
    pub ui: Option<UiMode>,
}

/// One step run in response to a detected change.
///
/// Every action runs with the watch root as its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `git add . ; git commit -m '<timestamp>'`
    CommitAll,
    /// Arbitrary shell command string, passed to the platform shell untouched.
    Shell(String),
}

impl Action {
    /// Short human-readable name used by the presentation sinks.
    pub fn label(&self) -> &str {
        match self {
            Action::CommitAll => "git commit",
            Action::Shell(cmd) => cmd,
        }
    }
}

/// Effective, validated configuration for one run.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    root: PathBuf,
    patterns: Vec<String>,
    poll_interval: Duration,
    round_time: Duration,
    actions: Vec<Action>,
    ui: UiMode,
}

impl WatchConfig {
    /// Build without validation. Used by the validator and by tests.
    pub fn new_unchecked(
        root: PathBuf,
        patterns: Vec<String>,
        poll_interval: Duration,
        round_time: Duration,
        actions: Vec<Action>,
        ui: UiMode,
    ) -> Self {
        Self {
            root,
            patterns,
            poll_interval,
            round_time,
            actions,
            ui,
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn round_time(&self) -> Duration {
        self.round_time
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn ui(&self) -> UiMode {
        self.ui
    }

    pub fn commits(&self) -> bool {
        self.actions.contains(&Action::CommitAll)
    }
}
