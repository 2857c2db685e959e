// src/engine/detector.rs

//! Pure change-detection state.
//!
//! Holds the last committed fingerprint and answers "did the tree change?".
//! No IO, no Tokio; the async shell in [`super::change_loop`] feeds it.

use crate::watch::Fingerprint;

#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    /// `None` until the first sample is committed, so the very first
    /// observation always counts as a change (even for an empty tree).
    previous: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `current` differs from the stored fingerprint.
    pub fn observe(&self, current: Fingerprint) -> bool {
        self.previous != Some(current)
    }

    /// Replace the stored fingerprint after a full walk and dispatch.
    pub fn commit(&mut self, current: Fingerprint) {
        self.previous = Some(current);
    }

    pub fn previous(&self) -> Option<Fingerprint> {
        self.previous
    }
}
