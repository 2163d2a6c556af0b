//! Registry of buildings under the storage root.

use std::collections::HashMap;
use std::path::Path;

use floorplan_core::{
    is_hidden, sort_by_display_name, validate_name, EntryId, Folder, Result, StoreError,
};
use floorplan_store::{EntryKind, ListFilter, StorageRoot};
use tracing::{debug, info, warn};

use crate::import::{source_name, Importer};
use crate::Report;

/// Authoritative in-memory list of buildings.
///
/// The list is always sorted by name. Ids survive renames and reloads for
/// as long as the backing directory stays at the same location.
#[derive(Debug, Clone)]
pub struct FolderRegistry {
    storage: StorageRoot,
    include_hidden: bool,
    folders: Vec<Folder>,
}

impl FolderRegistry {
    /// Create an empty registry over `storage`. Call [`load`](Self::load) to populate it.
    pub fn new(storage: StorageRoot, include_hidden: bool) -> Self {
        Self {
            storage,
            include_hidden,
            folders: Vec::new(),
        }
    }

    /// Create a registry and load it from disk.
    pub fn open(storage: StorageRoot, include_hidden: bool) -> Result<Self> {
        let mut registry = Self::new(storage, include_hidden);
        registry.load()?;
        Ok(registry)
    }

    /// The storage root this registry enumerates.
    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    /// Cached buildings, sorted by name.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Number of cached buildings.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Look up a building by id.
    pub fn get(&self, id: EntryId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Look up a building by its exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// Re-enumerate the storage root and replace the cache.
    ///
    /// Only direct child directories are listed; stray files are skipped.
    /// On failure the previous cache is kept.
    pub fn load(&mut self) -> Result<()> {
        let filter = ListFilter::new().with_hidden(self.include_hidden);
        let entries = self
            .storage
            .list_entries(self.storage.root(), &filter)
            .report("load buildings")?;

        let known: HashMap<&Path, EntryId> = self
            .folders
            .iter()
            .map(|f| (f.location.as_path(), f.id))
            .collect();

        let mut folders = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.kind != EntryKind::Directory {
                debug!("Skipping non-directory entry {}", entry.path.display());
                continue;
            }
            let id = known
                .get(entry.path.as_path())
                .copied()
                .unwrap_or_else(EntryId::mint);
            folders.push(Folder::new(id, entry.path));
        }

        sort_by_display_name(&mut folders);
        debug!("Loaded {} buildings", folders.len());
        self.folders = folders;
        Ok(())
    }

    /// Create a new building directory named `name`.
    ///
    /// Fails with [`StoreError::NameCollision`] if a building with the same
    /// location is cached or anything exists at that path on disk.
    pub fn add(&mut self, name: &str) -> Result<Folder> {
        self.add_impl(name).report("add building")
    }

    fn add_impl(&mut self, name: &str) -> Result<Folder> {
        self.check_name(name)?;

        let location = self.storage.child(name);
        if self.is_cached(&location) {
            return Err(StoreError::NameCollision { path: location });
        }
        self.storage
            .create_directory(&location)
            .map_err(|e| match e {
                StoreError::DestinationExists { path } => StoreError::NameCollision { path },
                e => e,
            })?;

        let folder = Folder::new(EntryId::mint(), location);
        info!("Created building '{}'", folder.name);
        self.folders.push(folder.clone());
        sort_by_display_name(&mut self.folders);
        Ok(folder)
    }

    /// Rename a building in place, keeping its id.
    pub fn rename(&mut self, id: EntryId, new_name: &str) -> Result<Folder> {
        self.rename_impl(id, new_name).report("rename building")
    }

    fn rename_impl(&mut self, id: EntryId, new_name: &str) -> Result<Folder> {
        self.check_name(new_name)?;

        let index = self.index_of(id)?;
        let current = &self.folders[index];
        if current.name == new_name {
            return Ok(current.clone());
        }

        let parent = current
            .location
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.storage.root().to_path_buf());
        let destination = parent.join(new_name);
        if self.is_cached(&destination) {
            return Err(StoreError::DestinationExists { path: destination });
        }

        self.storage.move_entry(&current.location, &destination)?;

        let old_name = current.name.clone();
        self.folders[index].relocate(destination);
        sort_by_display_name(&mut self.folders);
        info!("Renamed building '{}' to '{}'", old_name, new_name);

        self.reconcile();
        self.get(id).cloned().ok_or(StoreError::UnknownEntry { id })
    }

    /// Remove a building and everything in it.
    ///
    /// The cache entry is removed only if the directory was removed.
    pub fn delete(&mut self, id: EntryId) -> Result<Folder> {
        self.delete_impl(id).report("delete building")
    }

    fn delete_impl(&mut self, id: EntryId) -> Result<Folder> {
        let index = self.index_of(id)?;
        self.storage.remove_entry(&self.folders[index].location)?;

        let folder = self.folders.remove(index);
        info!("Deleted building '{}'", folder.name);
        Ok(folder)
    }

    /// Copy an external directory into the root as a new building.
    pub fn import(&mut self, importer: &Importer, source: &Path) -> Result<Folder> {
        self.import_impl(importer, source).report("import building")
    }

    fn import_impl(&mut self, importer: &Importer, source: &Path) -> Result<Folder> {
        let name = source_name(source)?;
        self.check_name(name)?;

        let destination = self.storage.child(name);
        if self.is_cached(&destination) {
            return Err(StoreError::DestinationExists { path: destination });
        }

        let location = importer.import_folder(&self.storage, source)?;

        self.load()?;
        self.folders
            .iter()
            .find(|f| f.location == location)
            .cloned()
            .ok_or_else(|| StoreError::Io {
                path: location,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "imported building is not listed",
                ),
            })
    }

    /// Reload after a successful disk mutation. A failed reload leaves the
    /// in-place update standing.
    fn reconcile(&mut self) {
        if let Err(e) = self.load() {
            warn!("Cache not reconciled with disk: {}", e);
        }
    }

    fn check_name(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if !self.include_hidden && is_hidden(Path::new(name)) {
            return Err(StoreError::invalid_name(
                name,
                "hidden buildings are not listed",
            ));
        }
        Ok(())
    }

    fn is_cached(&self, location: &Path) -> bool {
        self.folders.iter().any(|f| f.location == location)
    }

    fn index_of(&self, id: EntryId) -> Result<usize> {
        self.folders
            .iter()
            .position(|f| f.id == id)
            .ok_or(StoreError::UnknownEntry { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> (TempDir, FolderRegistry) {
        let temp = TempDir::new().unwrap();
        let registry = FolderRegistry::open(StorageRoot::new(temp.path()), false).unwrap();
        (temp, registry)
    }

    #[test]
    fn test_add_rejects_cached_duplicate() {
        let (_temp, mut registry) = registry();
        registry.add("Tower A").unwrap();

        let err = registry.add("Tower A").unwrap_err();
        assert!(matches!(err, StoreError::NameCollision { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_rejects_hidden_name() {
        let (temp, mut registry) = registry();
        assert!(registry.add(".secret").is_err());
        assert!(!temp.path().join(".secret").exists());
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let (_temp, mut registry) = registry();
        let folder = registry.add("Tower A").unwrap();

        let renamed = registry.rename(folder.id, "Tower A").unwrap();
        assert_eq!(renamed.id, folder.id);
        assert_eq!(renamed.location, folder.location);
    }

    #[test]
    fn test_unknown_id() {
        let (_temp, mut registry) = registry();
        let err = registry.delete(EntryId::new(u64::MAX)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownEntry { .. }));
    }
}
