// src/watch/mod.rs

//! Change detection by sampling.
//!
//! - [`filter`] decides which file names are ignored (substring patterns).
//! - [`fingerprint`] walks the tree and folds all mtimes into one scalar.
//!
//! There is no OS event subscription here; the change loop simply samples
//! the fingerprint on a fixed cadence and compares.

pub mod filter;
pub mod fingerprint;

pub use filter::should_ignore;
pub use fingerprint::{compute_fingerprint, epoch_nanos, Fingerprint, VCS_METADATA_DIR};
