//! Name validation and path classification helpers.

use std::path::Path;

use crate::error::{Result, StoreError};

/// Longest name accepted for a building or document, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Validate a building or document name.
///
/// The name must already be trimmed by the caller; surrounding whitespace is
/// rejected rather than silently stripped.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::invalid_name(name, "name cannot be empty"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(StoreError::invalid_name(
            name,
            format!("name is too long (max {MAX_NAME_LEN} bytes)"),
        ));
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(StoreError::invalid_name(name, format!("name cannot contain {c:?}")));
        }
    }

    #[cfg(target_os = "windows")]
    for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
        if name.contains(c) {
            return Err(StoreError::invalid_name(name, format!("name cannot contain {c:?}")));
        }
    }

    if name == "." || name == ".." {
        return Err(StoreError::invalid_name(name, "'.' and '..' are reserved"));
    }

    if name.trim() != name {
        return Err(StoreError::invalid_name(
            name,
            "name cannot start or end with whitespace",
        ));
    }

    if name.ends_with('.') {
        return Err(StoreError::invalid_name(name, "name cannot end with a dot"));
    }

    Ok(())
}

/// Whether the last path segment marks a hidden entry.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Case-insensitive extension match.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
