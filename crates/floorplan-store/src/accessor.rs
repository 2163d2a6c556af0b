//! File system accessor for the storage root.

use std::fs;
use std::path::{Path, PathBuf};

use floorplan_core::{LibraryConfig, Result, StoreError};
use tracing::{debug, warn};

use crate::copy::copy_item;
use crate::filter::{EntryKind, ListFilter};

/// A direct child returned by [`StorageRoot::list_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Whether this is a file or a directory.
    pub kind: EntryKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

/// Stateless I/O wrapper around the storage root.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    root: PathBuf,
    use_trash: bool,
}

impl StorageRoot {
    /// Wrap an existing root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            use_trash: false,
        }
    }

    /// Resolve the storage root described by `config`, creating it on first use.
    pub fn resolve(config: &LibraryConfig) -> Result<Self> {
        let root = &config.root;
        if !root.is_dir() {
            debug!("Creating storage root {}", root.display());
            fs::create_dir_all(root).map_err(|e| StoreError::io(root, e))?;
        }

        Ok(Self {
            root: root.clone(),
            use_trash: config.use_trash,
        })
    }

    /// Whether removed entries go to the OS trash.
    pub fn uses_trash(&self) -> bool {
        self.use_trash
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a direct child of the root.
    pub fn child(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// List the direct children of `at` that pass `filter`, sorted by path.
    ///
    /// Symbolic links are followed for classification. Entries that vanish
    /// or cannot be classified while listing are skipped.
    pub fn list_entries(&self, at: &Path, filter: &ListFilter) -> Result<Vec<DirEntry>> {
        let read_dir = fs::read_dir(at).map_err(|e| StoreError::io(at, e))?;
        let mut entries = Vec::new();

        for entry in read_dir {
            let entry = entry.map_err(|e| StoreError::io(at, e))?;
            let path = entry.path();

            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    debug!("Skipping unreadable entry {}: {}", path.display(), e);
                    continue;
                }
            };

            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else if metadata.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            if !filter.accepts(&path, kind) {
                continue;
            }

            let size = if kind == EntryKind::File { metadata.len() } else { 0 };
            entries.push(DirEntry { path, kind, size });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Listed {} entries in {}", entries.len(), at.display());
        Ok(entries)
    }

    /// Create a single directory. Fails if anything already exists at `at`.
    pub fn create_directory(&self, at: &Path) -> Result<()> {
        fs::create_dir(at).map_err(|e| StoreError::io(at, e))
    }

    /// Remove a file, or a directory and everything below it.
    pub fn remove_entry(&self, at: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(at).map_err(|e| StoreError::io(at, e))?;

        if self.use_trash {
            return trash::delete(at).map_err(|e| StoreError::Io {
                path: at.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            });
        }

        let result = if metadata.is_dir() {
            fs::remove_dir_all(at)
        } else {
            fs::remove_file(at)
        };
        result.map_err(|e| StoreError::io(at, e))
    }

    /// Move `from` to `to`. The destination must not exist.
    pub fn move_entry(&self, from: &Path, to: &Path) -> Result<()> {
        ensure_vacant(to)?;
        fs::rename(from, to).map_err(|e| StoreError::io(from, e))
    }

    /// Copy `from` (file or directory tree) to `to`. The destination must not exist.
    ///
    /// On failure the partially written destination is removed.
    pub fn copy_entry(&self, from: &Path, to: &Path) -> Result<u64> {
        ensure_vacant(to)?;

        if to.starts_with(from) {
            return Err(StoreError::Io {
                path: to.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "cannot copy a directory into itself",
                ),
            });
        }

        match copy_item(from, to) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                discard_partial(to);
                Err(e)
            }
        }
    }
}

/// Fail if anything (including a dangling link) exists at `path`.
fn ensure_vacant(path: &Path) -> Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(StoreError::DestinationExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn discard_partial(path: &Path) {
    let result = match fs::symlink_metadata(path) {
        Ok(m) if m.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(_) => return,
    };

    if let Err(e) = result {
        warn!("Failed to remove partial copy at {}: {}", path.display(), e);
    }
}
