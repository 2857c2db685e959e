use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use dojowatch::engine::{ShutdownSignal, ShutdownTrigger};
use dojowatch::errors::DojoError;
use dojowatch::exec::{CommandResult, CommandRunner, RunFuture, RunOutcome};

/// What a scripted command does when invoked.
#[derive(Debug, Clone)]
pub enum Script {
    /// Finish with this status and output.
    Exit(i32, Vec<u8>),
    /// Fail as if the shell could not be started.
    LaunchFailure,
    /// Fail while supervising an already started command (broken pipe).
    IoFailure,
    /// Block until shutdown, then report cancellation.
    BlockUntilShutdown,
    /// Fire the trigger, then finish with this status.
    ExitAndShutdown(i32, ShutdownTrigger),
}

/// A fake runner that:
/// - records every command it was asked to run (in order)
/// - answers from a list of `(command prefix, script)` rules; the first
///   matching prefix wins, unmatched commands exit 0 with no output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Script)>,
    invoked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prefix: &str, script: Script) -> Self {
        self.rules.push((prefix.to_string(), script));
        self
    }

    /// Shared handle on the invocation log; stays valid after the runner moves.
    pub fn invocations(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.invoked)
    }

    fn script_for(&self, command: &str) -> Script {
        self.rules
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, script)| script.clone())
            .unwrap_or(Script::Exit(0, Vec::new()))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a str,
        _cwd: &'a Path,
        mut shutdown: ShutdownSignal,
    ) -> RunFuture<'a> {
        self.invoked.lock().unwrap().push(command.to_string());
        let script = self.script_for(command);

        Box::pin(async move {
            match script {
                Script::Exit(code, output) => Ok(RunOutcome::Completed(CommandResult::new(code, output))),
                Script::LaunchFailure => Err(DojoError::Spawn {
                    command: command.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no shell"),
                }),
                Script::IoFailure => Err(DojoError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "pipe closed",
                ))),
                Script::BlockUntilShutdown => {
                    shutdown.triggered().await;
                    Ok(RunOutcome::Cancelled)
                }
                Script::ExitAndShutdown(code, trigger) => {
                    trigger.trigger();
                    Ok(RunOutcome::Completed(CommandResult::new(code, Vec::new())))
                }
            }
        })
    }
}
