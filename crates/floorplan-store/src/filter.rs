//! Directory listing filters.

use std::path::Path;

use floorplan_core::{has_extension, is_hidden};
use serde::{Deserialize, Serialize};

/// Kind of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntryKind {
    /// Accept both files and directories.
    #[default]
    Any,
    /// Directories only.
    Directory,
    /// Regular files only.
    File,
}

/// Which direct children `list_entries` returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilter {
    /// Include entries whose name starts with a dot.
    pub include_hidden: bool,
    /// Restrict to one kind of entry.
    pub kind: EntryKind,
    /// Case-insensitive extension to keep (files only).
    pub extension: Option<String>,
}

impl ListFilter {
    /// A filter that keeps every visible entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or drop hidden entries.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Keep only entries of `kind`.
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Keep only files with the given extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Check whether an entry at `path` of `kind` passes the filter.
    pub fn accepts(&self, path: &Path, kind: EntryKind) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        if self.kind != EntryKind::Any && self.kind != kind {
            return false;
        }

        match &self.extension {
            Some(ext) => kind == EntryKind::File && has_extension(path, ext),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skips_hidden() {
        let filter = ListFilter::new();
        assert!(!filter.accepts(Path::new("/r/.git"), EntryKind::Directory));
        assert!(filter.accepts(Path::new("/r/Tower"), EntryKind::Directory));
        assert!(filter.with_hidden(true).accepts(Path::new("/r/.git"), EntryKind::Directory));
    }

    #[test]
    fn test_kind_filter() {
        let filter = ListFilter::new().with_kind(EntryKind::Directory);
        assert!(filter.accepts(Path::new("/r/Tower"), EntryKind::Directory));
        assert!(!filter.accepts(Path::new("/r/notes.txt"), EntryKind::File));
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let filter = ListFilter::new().with_extension("pdf");
        assert!(filter.accepts(Path::new("/r/A/plan.pdf"), EntryKind::File));
        assert!(filter.accepts(Path::new("/r/A/plan.Pdf"), EntryKind::File));
        assert!(!filter.accepts(Path::new("/r/A/plan.png"), EntryKind::File));
        assert!(!filter.accepts(Path::new("/r/A/sub.pdf"), EntryKind::Directory));
    }
}
