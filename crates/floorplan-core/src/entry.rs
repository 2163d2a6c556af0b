//! Building and document entry types.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Session-local identifier for a building or document.
///
/// Ids are minted from a process-wide counter and never persisted. A registry
/// keeps the same id for an entry across renames and reloads, so callers can
/// hold on to it instead of a list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Create an EntryId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Mint a fresh id that no other entry in this process carries.
    pub fn mint() -> Self {
        Self(NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Common view over folders and documents used for ordering and lookups.
pub trait Entry {
    /// The entry's session id.
    fn id(&self) -> EntryId;
    /// The name shown to the user.
    fn display_name(&self) -> &str;
    /// Absolute location on disk.
    fn location(&self) -> &Path;
}

/// Sort entries by display name ascending.
///
/// Ties (possible only for documents whose extensions differ in case) are
/// broken by location so the order is total.
pub fn sort_by_display_name<T: Entry>(entries: &mut [T]) {
    entries.sort_by(|a, b| {
        a.display_name()
            .cmp(b.display_name())
            .then_with(|| a.location().cmp(b.location()))
    });
}

/// A building: a direct child directory of the storage root.
///
/// Construction is pure. Equality is by location only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Session id.
    pub id: EntryId,
    /// Last path segment of `location`.
    pub name: CompactString,
    /// Absolute path of the backing directory.
    pub location: PathBuf,
}

impl Folder {
    /// Create a folder value for `location` with the given id.
    pub fn new(id: EntryId, location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        Self {
            id,
            name: last_segment(&location),
            location,
        }
    }

    /// Point this folder at a new location, keeping its id.
    pub fn relocate(&mut self, location: impl Into<PathBuf>) {
        self.location = location.into();
        self.name = last_segment(&self.location);
    }
}

impl PartialEq for Folder {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Folder {}

impl Entry for Folder {
    fn id(&self) -> EntryId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &Path {
        &self.location
    }
}

/// A floorplan document inside a building.
///
/// Equality is by location only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Session id.
    pub id: EntryId,
    /// File name with the document extension stripped.
    pub display_name: CompactString,
    /// Absolute path of the file.
    pub location: PathBuf,
    /// Size in bytes when the document was last discovered.
    pub size: u64,
}

impl Document {
    /// Create a document value for `location`.
    ///
    /// `extension` is the registered document type; a matching suffix is
    /// stripped (case-insensitively) to form the display name.
    pub fn new(id: EntryId, location: impl Into<PathBuf>, extension: &str, size: u64) -> Self {
        let location = location.into();
        Self {
            id,
            display_name: strip_extension(&location, extension),
            location,
            size,
        }
    }

    /// The extension exactly as it appears on disk, if any.
    pub fn extension(&self) -> Option<&str> {
        self.location.extension().and_then(|e| e.to_str())
    }

    /// The directory containing this document.
    pub fn parent(&self) -> Option<&Path> {
        self.location.parent()
    }

    /// Point this document at a new location, keeping its id and size.
    pub fn relocate(&mut self, location: impl Into<PathBuf>, extension: &str) {
        self.location = location.into();
        self.display_name = strip_extension(&self.location, extension);
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Document {}

impl Entry for Document {
    fn id(&self) -> EntryId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn location(&self) -> &Path {
        &self.location
    }
}

fn last_segment(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::from(n.to_string_lossy()))
        .unwrap_or_default()
}

fn strip_extension(path: &Path, extension: &str) -> CompactString {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));

    if matches {
        path.file_stem()
            .map(|s| CompactString::from(s.to_string_lossy()))
            .unwrap_or_default()
    } else {
        last_segment(path)
    }
}
