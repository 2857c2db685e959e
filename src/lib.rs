// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod ui;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{Action, WatchConfig};
use crate::engine::{shutdown, spawn_round_timer, ChangeLoop, RoundTimer, ShutdownSignal};
use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::fs::RealFileSystem;
use crate::types::UiMode;
use crate::ui::{spawn_tui, ConsoleSink, PresentationSink};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the resolved config
/// - the presentation sink (console or terminal UI)
/// - the round timer (terminal UI only)
/// - the change loop with the real shell runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs, cfg: WatchConfig) -> Result<()> {
    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let cfg = Arc::new(cfg);
    let (trigger, signal) = shutdown::channel();

    // Ctrl-C → graceful shutdown.
    {
        let trigger = trigger.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; shutting down");
            trigger.trigger();
        });
    }

    match cfg.ui() {
        UiMode::Console => {
            let sink: Arc<dyn PresentationSink> = Arc::new(ConsoleSink::stdout());
            let result = run_change_loop(cfg, Arc::clone(&sink), signal).await;
            if result.is_ok() {
                sink.show_farewell();
            }
            result
        }
        UiMode::Tui => {
            let (timer_tx, timer_rx) = mpsc::unbounded_channel();
            let tui = spawn_tui(
                cfg.round_time().as_secs(),
                trigger.clone(),
                signal.clone(),
                timer_tx,
            )?;
            let sink: Arc<dyn PresentationSink> = tui.sink();

            let timer = spawn_round_timer(
                RoundTimer::new(cfg.round_time()),
                Arc::clone(&sink),
                timer_rx,
                signal.clone(),
            );

            let result = run_change_loop(cfg, sink, signal).await;

            // Whatever ended the loop, take the timer and the screen down too.
            trigger.trigger();
            if let Err(e) = timer.await {
                warn!(error = %e, "round timer task failed");
            }
            tui.join()?;

            if result.is_ok() {
                // The terminal is restored now, so speak on plain stdout.
                ConsoleSink::stdout().show_farewell();
            }
            result
        }
    }
}

async fn run_change_loop(
    cfg: Arc<WatchConfig>,
    sink: Arc<dyn PresentationSink>,
    signal: ShutdownSignal,
) -> Result<()> {
    sink.show_startup_info(cfg.root(), cfg.patterns());
    let change_loop = ChangeLoop::new(cfg, Arc::new(RealFileSystem), ShellRunner::new(), sink);
    change_loop.run(signal).await
}

/// Simple dry-run output: print what would be watched and run.
fn print_dry_run(cfg: &WatchConfig) {
    println!("dojowatch dry-run");
    println!("  directory = {}", cfg.root().display());
    println!("  patterns = {:?}", cfg.patterns());
    println!("  poll_interval = {}s", cfg.poll_interval().as_secs());
    println!("  round_time = {}s", cfg.round_time().as_secs());
    println!("  ui = {:?}", cfg.ui());
    println!();

    println!("actions ({}):", cfg.actions().len());
    for action in cfg.actions() {
        match action {
            Action::CommitAll => println!("  - git add . ; git commit -m '<timestamp>'"),
            Action::Shell(cmd) => println!("  - {cmd}"),
        }
    }

    debug!("dry-run complete (no execution)");
}
