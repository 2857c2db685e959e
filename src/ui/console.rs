// src/ui/console.rs

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::exec::CommandResult;
use crate::ui::PresentationSink;

/// Printed when the watcher stops normally.
pub const FAREWELL: &str = "leaving...";

/// Plain text sink. Command output is copied through byte for byte,
/// followed by a one-line status.
#[derive(Debug)]
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Write errors (e.g. closed stdout) are ignored: there is nowhere else to report them.
impl<W: Write + Send> PresentationSink for ConsoleSink<W> {
    fn show_startup_info(&self, directory: &Path, patterns: &[String]) {
        let mut out = self.lock();
        let _ = writeln!(out, "Monitoring files in {}", directory.display());
        if !patterns.is_empty() {
            let _ = writeln!(out, "ignoring files with {} in their name", patterns.join(" "));
        }
        let _ = writeln!(out, "press ^C to quit");
        let _ = out.flush();
    }

    fn show_result(&self, label: &str, result: &CommandResult) {
        let mut out = self.lock();
        let _ = out.write_all(&result.output);
        if !result.output.is_empty() && !result.output.ends_with(b"\n") {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "[exit {}] {}", result.exit_status, label);
        let _ = out.flush();
    }

    fn show_error(&self, label: &str, message: &str) {
        let mut out = self.lock();
        let _ = writeln!(out, "[error] {label}: {message}");
        let _ = out.flush();
    }

    fn show_countdown(&self, _remaining: u64) {}

    fn show_farewell(&self) {
        let mut out = self.lock();
        let _ = writeln!(out, "\n{FAREWELL}");
        let _ = out.flush();
    }
}
