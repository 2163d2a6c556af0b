//! Single-owner service that serializes library operations.

use std::path::PathBuf;

use floorplan_core::{Document, EntryId, Folder, Result, StoreError};
use floorplan_registry::Library;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::command::{Command, Reply};
use crate::SERVICE_CHANNEL_SIZE;

/// Owns a [`Library`] on a dedicated blocking task.
pub struct LibraryService;

impl LibraryService {
    /// Move `library` onto its own task and return a handle to it.
    ///
    /// Must be called from within a Tokio runtime. The service stops once
    /// every handle has been dropped.
    pub fn spawn(library: Library) -> LibraryHandle {
        let (tx, rx) = mpsc::channel(SERVICE_CHANNEL_SIZE);

        tokio::task::spawn_blocking(move || run(library, rx));

        LibraryHandle { tx }
    }
}

fn run(mut library: Library, mut rx: mpsc::Receiver<Command>) {
    debug!("Library service started at {}", library.root().display());

    while let Some(command) = rx.blocking_recv() {
        debug!("Running {}", command.name());
        command.apply(&mut library);
    }

    debug!("Library service stopped");
}

/// Cloneable handle that queues commands for the service.
#[derive(Debug, Clone)]
pub struct LibraryHandle {
    tx: mpsc::Sender<Command>,
}

impl LibraryHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| StoreError::ServiceClosed)?;
        rx.await.map_err(|_| StoreError::ServiceClosed)?
    }

    /// Reload buildings and open document lists from disk.
    pub async fn reload(&self) -> Result<()> {
        self.request(|reply| Command::Reload { reply }).await
    }

    /// All buildings, sorted by name.
    pub async fn list_buildings(&self) -> Result<Vec<Folder>> {
        self.request(|reply| Command::ListBuildings { reply }).await
    }

    /// Look up a building by name.
    pub async fn building_by_name(&self, name: impl Into<String>) -> Result<Option<Folder>> {
        let name = name.into();
        self.request(|reply| Command::BuildingByName { name, reply })
            .await
    }

    /// Create an empty building.
    pub async fn create_building(&self, name: impl Into<String>) -> Result<Folder> {
        let name = name.into();
        self.request(|reply| Command::CreateBuilding { name, reply })
            .await
    }

    /// Rename a building.
    pub async fn rename_building(&self, id: EntryId, new_name: impl Into<String>) -> Result<Folder> {
        let new_name = new_name.into();
        self.request(|reply| Command::RenameBuilding {
            id,
            new_name,
            reply,
        })
        .await
    }

    /// Delete a building and its documents.
    pub async fn delete_building(&self, id: EntryId) -> Result<Folder> {
        self.request(|reply| Command::DeleteBuilding { id, reply })
            .await
    }

    /// Copy an external directory in as a building.
    pub async fn import_building(&self, source: impl Into<PathBuf>) -> Result<Folder> {
        let source = source.into();
        self.request(|reply| Command::ImportBuilding { source, reply })
            .await
    }

    /// The documents of a building, sorted by display name.
    pub async fn list_documents(&self, building_id: EntryId) -> Result<Vec<Document>> {
        self.request(|reply| Command::ListDocuments { building_id, reply })
            .await
    }

    /// Look up a document by display name within a building.
    pub async fn document_by_name(
        &self,
        building_id: EntryId,
        name: impl Into<String>,
    ) -> Result<Option<Document>> {
        let name = name.into();
        self.request(|reply| Command::DocumentByName {
            building_id,
            name,
            reply,
        })
        .await
    }

    /// Rename a document, keeping its extension.
    pub async fn rename_document(
        &self,
        id: EntryId,
        new_name: impl Into<String>,
    ) -> Result<Document> {
        let new_name = new_name.into();
        self.request(|reply| Command::RenameDocument {
            id,
            new_name,
            reply,
        })
        .await
    }

    /// Delete a document.
    pub async fn delete_document(&self, id: EntryId) -> Result<Document> {
        self.request(|reply| Command::DeleteDocument { id, reply })
            .await
    }

    /// Copy an external document into a building.
    pub async fn import_document(
        &self,
        building_id: EntryId,
        source: impl Into<PathBuf>,
    ) -> Result<Document> {
        let source = source.into();
        self.request(|reply| Command::ImportDocument {
            building_id,
            source,
            reply,
        })
        .await
    }
}
