// src/ui/mod.rs

//! Presentation sinks.
//!
//! The engine only talks to [`PresentationSink`]; it never knows whether
//! results end up on a plain console ([`console`]) or in the terminal UI
//! ([`tui`]).

use std::path::Path;

use crate::exec::CommandResult;

pub mod console;
pub mod tui;

pub use console::ConsoleSink;
pub use tui::{spawn_tui, TuiHandle, TuiSink, TuiState, UiEvent};

/// Capability interface for rendering what the engine does.
///
/// Called from the change loop and the round timer, possibly from
/// different tasks, hence `Send + Sync`.
pub trait PresentationSink: Send + Sync {
    /// Resolved watch directory and active ignore patterns, once at startup.
    fn show_startup_info(&self, directory: &Path, patterns: &[String]);

    /// An action is about to run.
    fn show_action_started(&self, _label: &str) {}

    /// An action finished, with any exit status.
    fn show_result(&self, label: &str, result: &CommandResult);

    /// An action could not be run at all.
    fn show_error(&self, label: &str, message: &str);

    /// Current round countdown, in seconds.
    fn show_countdown(&self, remaining: u64);

    fn show_farewell(&self);
}
