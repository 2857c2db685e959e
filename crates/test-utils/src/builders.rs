use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dojowatch::config::{Action, WatchConfig};
use dojowatch::types::UiMode;

/// Builder for `WatchConfig` to simplify test setup.
///
/// Skips validation, so roots may point into a `MockFileSystem`.
pub struct WatchConfigBuilder {
    root: PathBuf,
    patterns: Vec<String>,
    poll_interval: Duration,
    round_time: Duration,
    actions: Vec<Action>,
    ui: UiMode,
}

impl WatchConfigBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            patterns: Vec::new(),
            poll_interval: Duration::from_millis(10),
            round_time: Duration::from_secs(300),
            actions: Vec::new(),
            ui: UiMode::Console,
        }
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.patterns.push(pattern.to_string());
        self
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.actions.push(Action::Shell(cmd.to_string()));
        self
    }

    pub fn commit(mut self) -> Self {
        self.actions.push(Action::CommitAll);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn round_time(mut self, round_time: Duration) -> Self {
        self.round_time = round_time;
        self
    }

    pub fn build(self) -> WatchConfig {
        WatchConfig::new_unchecked(
            self.root,
            self.patterns,
            self.poll_interval,
            self.round_time,
            self.actions,
            self.ui,
        )
    }

    pub fn build_arc(self) -> Arc<WatchConfig> {
        Arc::new(self.build())
    }
}
