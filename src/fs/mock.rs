// src/fs/mock.rs

use super::{EntryKind, EntryStat, FileSystem};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
enum MockEntry {
    File(SystemTime),
    Dir(Vec<String>), // List of child names
}

/// In-memory tree with explicit modification times.
///
/// Paths are used as given; tests typically root everything at `"."`.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add (or touch) a file with an mtime of `secs` seconds after the epoch.
    pub fn add_file(&self, path: impl AsRef<Path>, secs: u64) {
        self.add_file_at(path, UNIX_EPOCH + Duration::from_secs(secs));
    }

    pub fn add_file_at(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        files.insert(path.clone(), MockEntry::File(modified));
        link_into_parent(&mut files, &path);
    }

    /// List `path` in its parent without backing it by an entry.
    ///
    /// `stat` on it fails with `NotFound`, like a file deleted between the
    /// directory listing and the stat call.
    pub fn add_dangling(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        files.remove(&path);
        link_into_parent(&mut files, &path);
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.lock();
        files.remove(path);
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent_of(path)) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                children.retain(|c| c != name);
            }
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let parent = parent_of(path);
    if parent == path {
        return;
    }
    ensure_dir_entry(files, parent);
    if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(files, path);
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("not found: {:?}", path))
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::File(_)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("not a directory: {:?}", path),
            )),
            None => Err(not_found(path)),
        }
    }

    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::File(modified)) => Ok(EntryStat {
                kind: EntryKind::File,
                modified: *modified,
            }),
            Some(MockEntry::Dir(_)) => Ok(EntryStat {
                kind: EntryKind::Dir,
                modified: UNIX_EPOCH,
            }),
            None => Err(not_found(path)),
        }
    }
}
