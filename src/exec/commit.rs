// src/exec/commit.rs

//! The built-in auto-commit action.

use std::path::Path;

use tracing::{error, info};

use crate::engine::shutdown::ShutdownSignal;
use crate::errors::{DojoError, Result};
use crate::exec::runner::{CommandRunner, RunOutcome};

/// Exit status git uses for "fatal" errors, including "not a git repository".
pub const GIT_FATAL_EXIT: i32 = 128;

/// Commit message: the local time in `ctime` layout, e.g. `Wed Oct 14 10:00:00 2026`.
pub fn commit_message() -> String {
    chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}

/// The two-step shell command. The commit runs even if `git add` fails,
/// so the exit status always comes from `git commit`.
pub fn commit_command(message: &str) -> String {
    if cfg!(windows) {
        format!("git add . & git commit -m \"{message}\"")
    } else {
        format!("git add .; git commit -m '{message}'")
    }
}

/// Stage everything under `dir` and commit it with a timestamp message.
///
/// Returns `DojoError::NotARepository` when git exits with
/// [`GIT_FATAL_EXIT`]; every other status is a normal result.
pub async fn commit_all<R>(runner: &mut R, dir: &Path, shutdown: ShutdownSignal) -> Result<RunOutcome>
where
    R: CommandRunner + ?Sized,
{
    let command = commit_command(&commit_message());
    let outcome = runner.run(&command, dir, shutdown).await?;

    if let RunOutcome::Completed(result) = &outcome {
        if result.exit_status == GIT_FATAL_EXIT {
            error!(?dir, "git refused to commit; not a usable repository");
            return Err(DojoError::NotARepository {
                path: dir.to_path_buf(),
            });
        }
        info!(exit_status = result.exit_status, "auto-commit finished");
    }

    Ok(outcome)
}
