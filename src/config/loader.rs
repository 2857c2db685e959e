// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, WatchConfig};
use crate::config::validate::{resolve, Overrides};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; validation happens in
/// [`resolve`] once the CLI overrides are known.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the effective `WatchConfig` from parsed CLI arguments.
///
/// - Reads `--config` if given (a missing file is an error).
/// - Merges it with the flags and positional commands.
/// - Validates the result.
pub fn load_and_validate(args: &CliArgs) -> Result<WatchConfig> {
    let (raw, file_dir) = match &args.config {
        Some(path) => {
            let raw = load_from_path(path)?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf);
            (raw, dir)
        }
        None => (RawConfigFile::default(), None),
    };

    let overrides = Overrides {
        directory: args.directory.clone(),
        commands: args.all_commands(),
        patterns: args.patterns.clone(),
        no_commit: args.no_commit,
        poll_interval_secs: args.interval,
        round_time_secs: args.round_time,
        ui: args.ui,
    };

    resolve(raw, file_dir.as_deref(), overrides)
}
