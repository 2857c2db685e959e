// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] defines the `CommandRunner` seam and the production
//!   `ShellRunner`, built on `tokio::process::Command`.
//! - [`commit`] is the fixed `git add` + `git commit` action and its
//!   "not a repository" detection.

pub mod commit;
pub mod runner;

pub use commit::{commit_all, commit_command, commit_message, GIT_FATAL_EXIT};
pub use runner::{CommandResult, CommandRunner, RunFuture, RunOutcome, ShellRunner};
