// src/engine/timer.rs

//! Round timer for pairing rotations.
//!
//! Purely advisory: it never gates change detection or dispatch, and
//! shares no state with the change loop. The presentation sink just
//! displays whatever it reports.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::shutdown::ShutdownSignal;
use crate::ui::PresentationSink;

/// Commands the UI can send to a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Toggle,
    /// Back to a full round, keeping the running/paused state.
    Reset,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub remaining: u64,
    /// True on the tick that brought the countdown to zero.
    pub round_finished: bool,
}

#[derive(Debug, Clone)]
pub struct RoundTimer {
    round_time: u64,
    remaining: u64,
    running: bool,
}

impl RoundTimer {
    /// New paused timer showing a full round. Sub-second parts are dropped;
    /// a zero duration is bumped to one second.
    pub fn new(round_time: Duration) -> Self {
        let round_time = round_time.as_secs().max(1);
        Self {
            round_time,
            remaining: round_time,
            running: false,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn round_time(&self) -> u64 {
        self.round_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    pub fn reset(&mut self) {
        self.remaining = self.round_time;
    }

    pub fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Start => self.start(),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Toggle => self.toggle(),
            TimerCommand::Reset => self.reset(),
        }
    }

    /// Advance one second. Paused timers don't move. From zero the
    /// countdown wraps back to a full round.
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick {
                remaining: self.remaining,
                round_finished: false,
            };
        }

        if self.remaining == 0 {
            self.remaining = self.round_time;
            return TimerTick {
                remaining: self.remaining,
                round_finished: false,
            };
        }

        self.remaining -= 1;
        TimerTick {
            remaining: self.remaining,
            round_finished: self.remaining == 0,
        }
    }
}

/// Drive `timer` once per second on its own task, reporting every value to
/// `sink`, until shutdown.
pub fn spawn_round_timer(
    mut timer: RoundTimer,
    sink: Arc<dyn PresentationSink>,
    mut commands: mpsc::UnboundedReceiver<TimerCommand>,
    mut shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; use it to show the start value.
        interval.tick().await;
        sink.show_countdown(timer.remaining());

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let tick = timer.tick();
                    if tick.round_finished {
                        info!(round_time = timer.round_time(), "round finished; time to rotate");
                    }
                    sink.show_countdown(tick.remaining);
                }
                Some(command) = commands.recv() => {
                    debug!(?command, "timer command");
                    timer.apply(command);
                    sink.show_countdown(timer.remaining());
                }
                _ = shutdown.triggered() => break,
            }
        }

        debug!("round timer stopped");
    })
}
