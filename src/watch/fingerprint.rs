// src/watch/fingerprint.rs

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace, warn};

use crate::fs::{EntryKind, FileSystem};
use crate::watch::filter::should_ignore;

/// Name of the version-control metadata directory.
///
/// Any directory whose path below the watch root contains this string is
/// skipped: the auto-commit action rewrites files in there on every run,
/// and counting them would re-trigger the loop forever.
pub const VCS_METADATA_DIR: &str = ".git";

/// Sum of the modification times of all watched files.
///
/// Stored as signed nanoseconds since the Unix epoch so that sub-second
/// precision survives the sum. Equal fingerprints mean no file was added,
/// removed or re-stamped; they say nothing about content.
///
/// Known limitation: two changes that shift mtimes by opposite amounts
/// cancel out and go unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(i128);

impl Fingerprint {
    /// Fingerprint of a tree with no watched files.
    pub const EMPTY: Fingerprint = Fingerprint(0);

    pub fn from_nanos(nanos: i128) -> Self {
        Fingerprint(nanos)
    }

    pub fn as_nanos(&self) -> i128 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.as_secs_f64())
    }
}

/// Signed nanoseconds between the epoch and `time`.
pub fn epoch_nanos(time: SystemTime) -> i128 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_nanos() as i128,
        Err(before) => -(before.duration().as_nanos() as i128),
    }
}

/// Walk `root` and sum the mtimes of every file not filtered out.
///
/// Never fails: entries that vanish or can't be read while walking simply
/// contribute nothing.
pub fn compute_fingerprint(fs: &dyn FileSystem, root: &Path, patterns: &[String]) -> Fingerprint {
    let mut total: i128 = 0;
    let mut files = 0usize;
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if is_vcs_path(root, &dir) {
            trace!(?dir, "skipping version-control metadata");
            continue;
        }

        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => {
                warn!(?root, error = %err, "watch root unreadable; treating tree as empty");
                return Fingerprint::EMPTY;
            }
            Err(err) => {
                debug!(?dir, error = %err, "directory vanished or unreadable during walk");
                continue;
            }
        };

        for path in entries {
            let stat = match fs.stat(&path) {
                Ok(stat) => stat,
                Err(err) => {
                    log_stat_failure(&path, &err);
                    continue;
                }
            };

            match stat.kind {
                EntryKind::Dir => stack.push(path),
                EntryKind::File => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy())
                        .unwrap_or_default();
                    if should_ignore(&name, patterns) {
                        continue;
                    }
                    total += epoch_nanos(stat.modified);
                    files += 1;
                }
                EntryKind::Other => {}
            }
        }
    }

    let fingerprint = Fingerprint(total);
    trace!(files, %fingerprint, "computed tree fingerprint");
    fingerprint
}

/// True if `dir`, relative to `root`, contains the metadata directory name.
fn is_vcs_path(root: &Path, dir: &Path) -> bool {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    rel.to_string_lossy().contains(VCS_METADATA_DIR)
}

fn log_stat_failure(path: &Path, err: &io::Error) {
    if err.kind() == io::ErrorKind::NotFound {
        debug!(?path, "file vanished between listing and stat");
    } else {
        debug!(?path, error = %err, "could not stat entry; ignoring it");
    }
}
