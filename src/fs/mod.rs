// src/fs/mod.rs

//! Filesystem seam used by the tree fingerprint.
//!
//! Errors are plain `io::Result` so callers can tell a vanished entry
//! (`NotFound`) apart from other failures.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub mod mock;

/// What a directory entry turned out to be when it was stat'ed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file, or a symlink resolving to one.
    File,
    /// Real directory. Symlinked directories report `Other`.
    Dir,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub kind: EntryKind,
    pub modified: SystemTime,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Kind and mtime of one entry. Symlinks to directories report `Other`.
    fn stat(&self, path: &Path) -> io::Result<EntryStat>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        let link_meta = fs::symlink_metadata(path)?;
        if link_meta.is_dir() {
            return Ok(EntryStat {
                kind: EntryKind::Dir,
                modified: link_meta.modified()?,
            });
        }

        // Follow file symlinks; a dangling link surfaces as NotFound here.
        let meta = if link_meta.file_type().is_symlink() {
            fs::metadata(path)?
        } else {
            link_meta
        };

        let kind = if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Ok(EntryStat {
            kind,
            modified: meta.modified()?,
        })
    }
}
