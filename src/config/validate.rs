// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::{
    Action, RawConfigFile, WatchConfig, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_ROUND_TIME_SECS,
};
use crate::errors::{DojoError, Result};
use crate::types::UiMode;

/// CLI-side values that take part in resolution.
///
/// Kept separate from `CliArgs` so the merge can be tested without clap.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub directory: Option<PathBuf>,
    pub commands: Vec<String>,
    pub patterns: Vec<String>,
    pub no_commit: bool,
    pub poll_interval_secs: Option<u64>,
    pub round_time_secs: Option<u64>,
    pub ui: Option<UiMode>,
}

/// Merge a (possibly empty) config file with CLI overrides and validate.
///
/// - Scalars: CLI wins over file, file wins over defaults.
/// - Lists: file entries first, then CLI entries.
/// - A relative `directory` from the file is resolved against `file_dir`.
pub fn resolve(raw: RawConfigFile, file_dir: Option<&Path>, cli: Overrides) -> Result<WatchConfig> {
    let watch = raw.watch;

    let directory = match (cli.directory, watch.directory) {
        (Some(dir), _) => dir,
        (None, Some(dir)) if dir.is_relative() => match file_dir {
            Some(base) => base.join(dir),
            None => dir,
        },
        (None, Some(dir)) => dir,
        (None, None) => std::env::current_dir()?,
    };
    let root = validate_root(&directory)?;

    let mut commands = watch.commands;
    commands.extend(cli.commands);

    let mut patterns = watch.patterns;
    patterns.extend(cli.patterns);

    let commit = !cli.no_commit && watch.commit.unwrap_or(true);

    let poll_secs = cli
        .poll_interval_secs
        .or(watch.poll_interval_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
    if poll_secs == 0 {
        return Err(DojoError::Config(
            "poll interval must be >= 1 second (got 0)".to_string(),
        ));
    }

    let round_secs = cli
        .round_time_secs
        .or(watch.round_time_secs)
        .unwrap_or(DEFAULT_ROUND_TIME_SECS);
    if round_secs == 0 {
        return Err(DojoError::Config(
            "round time must be >= 1 second (got 0)".to_string(),
        ));
    }

    let ui = cli.ui.or(watch.ui).unwrap_or_default();
    if ui == UiMode::Tui && commands.is_empty() {
        return Err(DojoError::Config(
            "the terminal UI needs at least one COMMAND to run".to_string(),
        ));
    }

    let mut actions = Vec::with_capacity(commands.len() + 1);
    if commit {
        actions.push(Action::CommitAll);
    }
    actions.extend(commands.into_iter().map(Action::Shell));

    Ok(WatchConfig::new_unchecked(
        root,
        patterns,
        Duration::from_secs(poll_secs),
        Duration::from_secs(round_secs),
        actions,
        ui,
    ))
}

/// The watch root must exist and be a directory; the result is absolute.
fn validate_root(directory: &Path) -> Result<PathBuf> {
    let root = directory.canonicalize().map_err(|e| {
        DojoError::Config(format!("watch directory {:?} is not usable: {e}", directory))
    })?;
    if !root.is_dir() {
        return Err(DojoError::Config(format!(
            "watch directory {:?} is not a directory",
            root
        )));
    }
    Ok(root)
}
