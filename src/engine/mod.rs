// src/engine/mod.rs

//! Change-detection and dispatch engine for dojowatch.
//!
//! - [`detector`] is the pure "did anything change" state.
//! - [`change_loop`] is the async shell around it: it samples the tree,
//!   runs the actions and reports to the presentation sink.
//! - [`timer`] is the independent round countdown.
//! - [`shutdown`] carries the cancellation signal to all of the above.

pub mod change_loop;
pub mod detector;
pub mod shutdown;
pub mod timer;

pub use change_loop::{AbortReason, ChangeLoop, TickReport};
pub use detector::ChangeDetector;
pub use shutdown::{ShutdownSignal, ShutdownTrigger};
pub use timer::{spawn_round_timer, RoundTimer, TimerCommand, TimerTick};
