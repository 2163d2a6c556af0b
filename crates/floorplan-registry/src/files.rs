//! Registry of documents inside one building.

use std::collections::HashMap;
use std::path::Path;

use floorplan_core::{
    has_extension, is_hidden, sort_by_display_name, validate_name, Document, EntryId, Folder,
    Result, StoreError,
};
use floorplan_store::{EntryKind, ListFilter, StorageRoot};
use tracing::{debug, info};

use crate::import::{source_name, Importer};
use crate::Report;

/// In-memory list of the documents in a single building.
///
/// Only regular files whose extension matches the configured document type
/// (case-insensitively) are tracked. The list is always sorted by display name.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    storage: StorageRoot,
    folder: Folder,
    extension: String,
    include_hidden: bool,
    documents: Vec<Document>,
}

impl FileRegistry {
    /// Create an empty registry scoped to `folder`.
    pub fn new(
        storage: StorageRoot,
        folder: Folder,
        extension: impl Into<String>,
        include_hidden: bool,
    ) -> Self {
        Self {
            storage,
            folder,
            extension: extension.into(),
            include_hidden,
            documents: Vec::new(),
        }
    }

    /// Create a registry scoped to `folder` and load it from disk.
    pub fn open(
        storage: StorageRoot,
        folder: Folder,
        extension: impl Into<String>,
        include_hidden: bool,
    ) -> Result<Self> {
        let mut registry = Self::new(storage, folder, extension, include_hidden);
        registry.load()?;
        Ok(registry)
    }

    /// The building this registry is scoped to.
    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    /// The managed document extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Cached documents, sorted by display name.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by id.
    pub fn get(&self, id: EntryId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Look up a document by display name.
    pub fn find_by_name(&self, display_name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.display_name == display_name)
    }

    /// Re-enumerate the building directory and replace the cache.
    ///
    /// On failure the previous cache is kept.
    pub fn load(&mut self) -> Result<()> {
        let filter = ListFilter::new()
            .with_hidden(self.include_hidden)
            .with_kind(EntryKind::File)
            .with_extension(self.extension.as_str());
        let entries = self
            .storage
            .list_entries(&self.folder.location, &filter)
            .report("load documents")?;

        let known: HashMap<&Path, EntryId> = self
            .documents
            .iter()
            .map(|d| (d.location.as_path(), d.id))
            .collect();

        let mut documents: Vec<Document> = entries
            .into_iter()
            .map(|entry| {
                let id = known
                    .get(entry.path.as_path())
                    .copied()
                    .unwrap_or_else(EntryId::mint);
                Document::new(id, entry.path, &self.extension, entry.size)
            })
            .collect();

        sort_by_display_name(&mut documents);
        debug!(
            "Loaded {} documents in '{}'",
            documents.len(),
            self.folder.name
        );
        self.documents = documents;
        Ok(())
    }

    /// Rename a document within its building, keeping its extension and id.
    ///
    /// `new_name` is the display name; the original extension (as spelled on
    /// disk) is appended.
    pub fn rename(&mut self, id: EntryId, new_name: &str) -> Result<Document> {
        self.rename_impl(id, new_name).report("rename document")
    }

    fn rename_impl(&mut self, id: EntryId, new_name: &str) -> Result<Document> {
        self.check_name(new_name)?;

        let index = self.index_of(id)?;
        let current = &self.documents[index];

        let file_name = match current.extension() {
            Some(ext) => format!("{new_name}.{ext}"),
            None => new_name.to_string(),
        };
        let parent = current.parent().unwrap_or(self.folder.location.as_path());
        let destination = parent.join(file_name);

        if destination == current.location {
            return Ok(current.clone());
        }
        if let Some(existing) = self
            .documents
            .iter()
            .find(|d| d.id != id && (d.location == destination || d.display_name == new_name))
        {
            return Err(StoreError::DestinationExists {
                path: existing.location.clone(),
            });
        }

        self.storage.move_entry(&current.location, &destination)?;

        let old_name = current.display_name.clone();
        self.documents[index].relocate(destination, &self.extension);
        sort_by_display_name(&mut self.documents);
        info!("Renamed document '{}' to '{}'", old_name, new_name);

        self.get(id).cloned().ok_or(StoreError::UnknownEntry { id })
    }

    /// Remove a document. The cache entry is removed only if the file was removed.
    pub fn delete(&mut self, id: EntryId) -> Result<Document> {
        self.delete_impl(id).report("delete document")
    }

    fn delete_impl(&mut self, id: EntryId) -> Result<Document> {
        let index = self.index_of(id)?;
        self.storage.remove_entry(&self.documents[index].location)?;

        let document = self.documents.remove(index);
        info!("Deleted document '{}'", document.display_name);
        Ok(document)
    }

    /// Copy an external document into this building and refresh the cache.
    pub fn import(&mut self, importer: &Importer, source: &Path) -> Result<Document> {
        self.import_impl(importer, source).report("import document")
    }

    fn import_impl(&mut self, importer: &Importer, source: &Path) -> Result<Document> {
        let name = source_name(source)?;
        self.check_name(name)?;

        let name = Path::new(name);
        if has_extension(name, &self.extension) {
            let display_name = name.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if let Some(existing) = self.find_by_name(display_name) {
                return Err(StoreError::DestinationExists {
                    path: existing.location.clone(),
                });
            }
        }

        let location = importer.import_document(
            &self.storage,
            source,
            &self.folder.location,
            &self.extension,
        )?;

        self.load()?;
        self.documents
            .iter()
            .find(|d| d.location == location)
            .cloned()
            .ok_or_else(|| StoreError::Io {
                path: location,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "imported document is not listed",
                ),
            })
    }

    /// Point the registry at a renamed building, keeping document ids.
    pub fn rebase(&mut self, folder: Folder) {
        for document in &mut self.documents {
            if let Some(name) = document.location.file_name() {
                let location = folder.location.join(name);
                document.relocate(location, &self.extension);
            }
        }
        self.folder = folder;
    }

    fn check_name(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if !self.include_hidden && is_hidden(Path::new(name)) {
            return Err(StoreError::invalid_name(
                name,
                "hidden documents are not listed",
            ));
        }
        Ok(())
    }

    fn index_of(&self, id: EntryId) -> Result<usize> {
        self.documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(StoreError::UnknownEntry { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rebase_keeps_ids() {
        let temp = TempDir::new().unwrap();
        let old = temp.path().join("Old");
        std::fs::create_dir(&old).unwrap();
        std::fs::write(old.join("plan.pdf"), b"x").unwrap();

        let folder = Folder::new(EntryId::mint(), &old);
        let mut registry =
            FileRegistry::open(StorageRoot::new(temp.path()), folder.clone(), "pdf", false)
                .unwrap();
        let id = registry.documents()[0].id;

        let mut moved = folder;
        moved.relocate(temp.path().join("New"));
        registry.rebase(moved);

        let doc = registry.get(id).unwrap();
        assert_eq!(doc.location, temp.path().join("New").join("plan.pdf"));
        assert_eq!(registry.folder().name, "New");
    }

    #[test]
    fn test_rename_rejects_hidden_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("plan.pdf"), b"x").unwrap();

        let folder = Folder::new(EntryId::mint(), temp.path());
        let mut registry =
            FileRegistry::open(StorageRoot::new(temp.path()), folder, "pdf", false).unwrap();
        let id = registry.documents()[0].id;

        assert!(registry.rename(id, ".plan").is_err());
        assert!(temp.path().join("plan.pdf").exists());
    }
}
