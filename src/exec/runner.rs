// src/exec/runner.rs

//! Shell command runner.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::engine::shutdown::ShutdownSignal;
use crate::errors::{DojoError, Result};

/// Exit status and captured output of one finished command.
///
/// `output` holds everything the command wrote to stdout, followed by
/// everything it wrote to stderr. Line interleaving between the two
/// streams is not preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_status: i32,
    pub output: Vec<u8>,
}

impl CommandResult {
    pub fn new(exit_status: i32, output: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_status,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_status == 0
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// How a `run` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(CommandResult),
    /// Shutdown was requested while the command ran; the process was killed.
    Cancelled,
}

pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<RunOutcome>> + Send + 'a>>;

/// Trait abstracting how a command string is executed.
///
/// Production code uses [`ShellRunner`]; tests provide scripted runners
/// that don't spawn real processes.
///
/// A nonzero exit is a normal `Completed` result. `Err` is reserved for
/// failures of the runner itself, such as the shell not starting.
pub trait CommandRunner: Send {
    fn run<'a>(&'a mut self, command: &'a str, cwd: &'a Path, shutdown: ShutdownSignal)
    -> RunFuture<'a>;
}

/// Runs commands through the platform shell (`sh -c`, or `cmd /C` on Windows).
///
/// The command string is handed over untouched, so pipes, `;`, `&&` and
/// other shell syntax work as typed.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a str,
        cwd: &'a Path,
        shutdown: ShutdownSignal,
    ) -> RunFuture<'a> {
        Box::pin(run_shell(command, cwd, shutdown))
    }
}

/// Build a shell command appropriate for the platform.
///
/// On Unix the shell leads a fresh process group, so cancellation can reach
/// everything it forked.
#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut c = Command::new("sh");
    c.arg("-c").arg(command).process_group(0);
    c
}

#[cfg(not(unix))]
fn shell_command(command: &str) -> Command {
    let mut c = Command::new("cmd");
    c.arg("/C").arg(command);
    c
}

/// SIGKILL the whole process group led by the shell.
#[cfg(unix)]
fn kill_process_group(command: &str, pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else { return };
    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(cmd = %command, pid, error = %e, "failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_command: &str, _pid: Option<u32>) {}

async fn run_shell(command: &str, cwd: &Path, mut shutdown: ShutdownSignal) -> Result<RunOutcome> {
    info!(cmd = %command, ?cwd, "starting command");
    let started = Instant::now();

    let mut cmd = shell_command(command);
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| DojoError::Spawn {
        command: command.to_string(),
        source,
    })?;

    let pid = child.id();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Either the process exits on its own (normal case), or shutdown is
    // requested and we kill it before returning.
    tokio::select! {
        res = async { tokio::try_join!(read_all(stdout), read_all(stderr), child.wait()) } => {
            let (mut output, err_bytes, status) = res?;
            output.extend_from_slice(&err_bytes);

            let exit_status = exit_code(status);
            info!(
                cmd = %command,
                exit_status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "command exited"
            );

            Ok(RunOutcome::Completed(CommandResult { exit_status, output }))
        }

        _ = shutdown.triggered() => {
            info!(cmd = %command, "shutdown requested while command running; killing process group");
            kill_process_group(command, pid);
            // `kill` also waits, so the shell is reaped before we return.
            if let Err(e) = child.kill().await {
                warn!(cmd = %command, error = %e, "failed to kill child process on shutdown");
            }
            debug!(cmd = %command, "child process reaped");
            Ok(RunOutcome::Cancelled)
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Exit code as reported by the OS. On Unix a signal-terminated process
/// reports the negated signal number.
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
