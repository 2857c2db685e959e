// src/types.rs

use clap::ValueEnum;
use serde::Deserialize;

/// Which presentation sink renders command results.
///
/// - `Console`: plain text on stdout, like a classic watch script.
/// - `Tui`: interactive terminal UI with the round timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    #[default]
    Console,
    Tui,
}
