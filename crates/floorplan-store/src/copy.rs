//! Recursive copy used by `StorageRoot::copy_entry`.

use std::fs;
use std::path::Path;

use floorplan_core::{Result, StoreError};
use tracing::debug;

/// Copy a single item (file or directory) and return the bytes written.
///
/// The destination must not exist. Nothing is cleaned up here; the caller
/// removes a partial destination on error.
pub(crate) fn copy_item(source: &Path, dest: &Path) -> Result<u64> {
    let metadata = fs::metadata(source).map_err(|e| StoreError::io(source, e))?;

    if metadata.is_dir() {
        copy_dir_recursive(source, dest)
    } else {
        copy_file(source, dest)
    }
}

/// Copy a single file.
fn copy_file(source: &Path, dest: &Path) -> Result<u64> {
    fs::copy(source, dest).map_err(|e| StoreError::io(dest, e))
}

/// Recursively copy a directory.
///
/// Symbolic links below `source` are skipped so a link to an ancestor cannot
/// recurse and a link pointing elsewhere cannot pull outside content in.
fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<u64> {
    fs::create_dir(dest).map_err(|e| StoreError::io(dest, e))?;

    let mut total_bytes = 0u64;

    let entries = fs::read_dir(source).map_err(|e| StoreError::io(source, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(source, e))?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| StoreError::io(&path, e))?;

        if file_type.is_symlink() {
            debug!("Skipping symbolic link {}", path.display());
            continue;
        }

        if file_type.is_dir() {
            total_bytes += copy_dir_recursive(&path, &dest_path)?;
        } else {
            total_bytes += copy_file(&path, &dest_path)?;
        }
    }

    Ok(total_bytes)
}
