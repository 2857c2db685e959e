// src/engine/change_loop.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{Action, WatchConfig};
use crate::engine::detector::ChangeDetector;
use crate::engine::shutdown::ShutdownSignal;
use crate::errors::{DojoError, Result};
use crate::exec::{commit_all, CommandRunner, RunOutcome};
use crate::fs::FileSystem;
use crate::ui::PresentationSink;
use crate::watch::{compute_fingerprint, Fingerprint};

/// Why a tick stopped dispatching before the last action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The runner failed: the shell could not be started, or its pipes or
    /// exit status could not be read.
    RunnerFailed,
    /// Shutdown was requested.
    Cancelled,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub fingerprint: Fingerprint,
    pub changed: bool,
    /// Actions that ran to completion (any exit status).
    pub completed: usize,
    pub aborted: Option<AbortReason>,
}

/// Polls the tree fingerprint and dispatches the configured actions, in
/// order, whenever it changes.
///
/// Everything runs on one control flow: no tick starts before the previous
/// tick's actions have finished, and no two actions ever overlap.
pub struct ChangeLoop<R: CommandRunner> {
    config: Arc<WatchConfig>,
    fs: Arc<dyn FileSystem>,
    runner: R,
    sink: Arc<dyn PresentationSink>,
    detector: ChangeDetector,
}

impl<R: CommandRunner> fmt::Debug for ChangeLoop<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeLoop")
            .field("config", &self.config)
            .field("detector", &self.detector)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> ChangeLoop<R> {
    pub fn new(
        config: Arc<WatchConfig>,
        fs: Arc<dyn FileSystem>,
        runner: R,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            config,
            fs,
            runner,
            sink,
            detector: ChangeDetector::new(),
        }
    }

    /// Main loop: tick, sleep one poll interval, repeat until shutdown.
    ///
    /// Returns `Err` only for fatal conditions (a broken repository for the
    /// auto-commit action); command failures are reported to the sink.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<()> {
        info!(root = ?self.config.root(), "change loop started");

        while !shutdown.is_triggered() {
            let report = self.tick(&shutdown).await?;
            debug!(?report, "tick finished");

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
                _ = shutdown.triggered() => break,
            }
        }

        info!("change loop stopped");
        Ok(())
    }

    /// One poll: sample the tree, and if it changed run every action.
    pub async fn tick(&mut self, shutdown: &ShutdownSignal) -> Result<TickReport> {
        let current = self.sample().await?;

        if !self.detector.observe(current) {
            return Ok(TickReport {
                fingerprint: current,
                changed: false,
                completed: 0,
                aborted: None,
            });
        }

        info!(
            fingerprint = %current,
            previous = ?self.detector.previous().map(|p| p.to_string()),
            "change detected; dispatching actions"
        );

        let dispatch = self.dispatch(shutdown).await;
        self.detector.commit(current);
        let (completed, aborted) = dispatch?;

        Ok(TickReport {
            fingerprint: current,
            changed: true,
            completed,
            aborted,
        })
    }

    /// Compute the fingerprint off the async threads; the walk is blocking IO.
    async fn sample(&self) -> Result<Fingerprint> {
        let fs = Arc::clone(&self.fs);
        let config = Arc::clone(&self.config);

        tokio::task::spawn_blocking(move || {
            compute_fingerprint(fs.as_ref(), config.root(), config.patterns())
        })
        .await
        .map_err(|e| DojoError::Other(e.into()))
    }

    async fn dispatch(&mut self, shutdown: &ShutdownSignal) -> Result<(usize, Option<AbortReason>)> {
        let config = Arc::clone(&self.config);
        let root = config.root();
        let mut completed = 0;

        for action in config.actions() {
            let label = action.label();

            if shutdown.is_triggered() {
                info!(action = %label, "shutdown requested; not starting remaining actions");
                return Ok((completed, Some(AbortReason::Cancelled)));
            }

            self.sink.show_action_started(label);

            let outcome = match action {
                Action::CommitAll => commit_all(&mut self.runner, root, shutdown.clone()).await,
                Action::Shell(cmd) => self.runner.run(cmd, root, shutdown.clone()).await,
            };

            match outcome {
                Ok(RunOutcome::Completed(result)) => {
                    completed += 1;
                    if !result.success() {
                        debug!(action = %label, exit_status = result.exit_status, "action exited nonzero");
                    }
                    self.sink.show_result(label, &result);
                }
                Ok(RunOutcome::Cancelled) => {
                    return Ok((completed, Some(AbortReason::Cancelled)));
                }
                Err(err @ DojoError::NotARepository { .. }) => {
                    error!(action = %label, error = %err, "fatal action failure");
                    self.sink.show_error(label, &err.to_string());
                    return Err(err);
                }
                Err(err) => {
                    warn!(action = %label, error = %err, "action could not be run; skipping rest of this tick");
                    self.sink.show_error(label, &err.to_string());
                    return Ok((completed, Some(AbortReason::RunnerFailed)));
                }
            }
        }

        Ok((completed, None))
    }
}
