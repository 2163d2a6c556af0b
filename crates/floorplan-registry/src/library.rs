//! Id-keyed operations over buildings and their documents.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::path::Path;
use std::sync::Arc;

use floorplan_core::{Document, EntryId, Folder, LibraryConfig, Result, StoreError};
use floorplan_store::StorageRoot;
use tracing::warn;

use crate::access::AccessBroker;
use crate::files::FileRegistry;
use crate::folders::FolderRegistry;
use crate::import::Importer;

/// The user-facing operations surface.
///
/// Buildings are loaded on open; a building's documents are loaded the first
/// time they are asked for. All mutations take `&mut self`, so a `Library`
/// is mutated by one caller at a time.
#[derive(Debug)]
pub struct Library {
    config: LibraryConfig,
    storage: StorageRoot,
    importer: Importer,
    folders: FolderRegistry,
    files: HashMap<EntryId, FileRegistry>,
}

impl Library {
    /// Open the library described by `config`, creating the storage root if needed.
    pub fn open(config: LibraryConfig) -> Result<Self> {
        Self::with_importer(config, Importer::default())
    }

    /// Open the library using `broker` for scoped access to picked sources.
    pub fn with_broker(config: LibraryConfig, broker: Arc<dyn AccessBroker>) -> Result<Self> {
        Self::with_importer(config, Importer::new(broker))
    }

    fn with_importer(config: LibraryConfig, importer: Importer) -> Result<Self> {
        let storage = StorageRoot::resolve(&config)?;
        let folders = FolderRegistry::open(storage.clone(), config.include_hidden)?;

        Ok(Self {
            config,
            storage,
            importer,
            folders,
            files: HashMap::new(),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    /// Reload buildings and every open document list from disk.
    ///
    /// Document lists of buildings that disappeared are dropped.
    pub fn reload(&mut self) -> Result<()> {
        self.folders.load()?;

        let folders = &self.folders;
        self.files.retain(|id, _| folders.get(*id).is_some());

        for registry in self.files.values_mut() {
            if let Err(e) = registry.load() {
                warn!("Failed to reload '{}': {}", registry.folder().name, e);
            }
        }
        Ok(())
    }

    /// All buildings, sorted by name.
    pub fn list_buildings(&self) -> &[Folder] {
        self.folders.folders()
    }

    /// Look up a building by id.
    pub fn building(&self, id: EntryId) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Look up a building by name.
    pub fn building_by_name(&self, name: &str) -> Option<&Folder> {
        self.folders.find_by_name(name.trim())
    }

    /// Create an empty building.
    pub fn create_building(&mut self, name: &str) -> Result<Folder> {
        self.folders.add(name.trim())
    }

    /// Rename a building. Its id and its documents' ids are kept.
    pub fn rename_building(&mut self, id: EntryId, new_name: &str) -> Result<Folder> {
        let folder = self.folders.rename(id, new_name.trim())?;
        if let Some(registry) = self.files.get_mut(&id) {
            registry.rebase(folder.clone());
        }
        Ok(folder)
    }

    /// Delete a building and all its documents.
    pub fn delete_building(&mut self, id: EntryId) -> Result<Folder> {
        let folder = self.folders.delete(id)?;
        self.files.remove(&id);
        Ok(folder)
    }

    /// Copy an external directory in as a new building.
    pub fn import_building(&mut self, source: &Path) -> Result<Folder> {
        self.folders.import(&self.importer, source)
    }

    /// The documents of a building, sorted by display name.
    pub fn list_documents(&mut self, building_id: EntryId) -> Result<&[Document]> {
        Ok(self.registry_mut(building_id)?.documents())
    }

    /// Look up a document by id among the buildings opened so far.
    pub fn document(&self, id: EntryId) -> Option<&Document> {
        self.files.values().find_map(|registry| registry.get(id))
    }

    /// Look up a document by display name within a building.
    pub fn document_by_name(
        &mut self,
        building_id: EntryId,
        display_name: &str,
    ) -> Result<Option<&Document>> {
        Ok(self
            .registry_mut(building_id)?
            .find_by_name(display_name.trim()))
    }

    /// The building a document belongs to.
    pub fn building_of(&self, document_id: EntryId) -> Option<&Folder> {
        self.files
            .values()
            .find(|registry| registry.get(document_id).is_some())
            .map(FileRegistry::folder)
    }

    /// Rename a document, keeping its extension and id.
    pub fn rename_document(&mut self, id: EntryId, new_name: &str) -> Result<Document> {
        self.owning_registry(id)?.rename(id, new_name.trim())
    }

    /// Delete a document.
    pub fn delete_document(&mut self, id: EntryId) -> Result<Document> {
        self.owning_registry(id)?.delete(id)
    }

    /// Copy an external document into a building.
    pub fn import_document(&mut self, building_id: EntryId, source: &Path) -> Result<Document> {
        let importer = self.importer.clone();
        self.registry_mut(building_id)?.import(&importer, source)
    }

    fn registry_mut(&mut self, building_id: EntryId) -> Result<&mut FileRegistry> {
        let folder = self
            .folders
            .get(building_id)
            .cloned()
            .ok_or(StoreError::UnknownEntry { id: building_id })?;

        match self.files.entry(building_id) {
            MapEntry::Occupied(entry) => Ok(entry.into_mut()),
            MapEntry::Vacant(entry) => {
                let registry = FileRegistry::open(
                    self.storage.clone(),
                    folder,
                    self.config.document_extension.as_str(),
                    self.config.include_hidden,
                )?;
                Ok(entry.insert(registry))
            }
        }
    }

    fn owning_registry(&mut self, document_id: EntryId) -> Result<&mut FileRegistry> {
        self.files
            .values_mut()
            .find(|registry| registry.get(document_id).is_some())
            .ok_or(StoreError::UnknownEntry { id: document_id })
    }
}
