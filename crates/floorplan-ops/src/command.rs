//! Commands accepted by the library service.

use std::path::PathBuf;

use floorplan_core::{Document, EntryId, Folder, Result};
use floorplan_registry::Library;
use tokio::sync::oneshot;

/// Reply channel carried by every command.
pub type Reply<T> = oneshot::Sender<Result<T>>;

/// A queued library operation.
#[derive(Debug)]
pub enum Command {
    /// Reload buildings and open document lists from disk.
    Reload { reply: Reply<()> },
    /// List all buildings.
    ListBuildings { reply: Reply<Vec<Folder>> },
    /// Look up a building by name.
    BuildingByName {
        name: String,
        reply: Reply<Option<Folder>>,
    },
    /// Create an empty building.
    CreateBuilding { name: String, reply: Reply<Folder> },
    /// Rename a building.
    RenameBuilding {
        id: EntryId,
        new_name: String,
        reply: Reply<Folder>,
    },
    /// Delete a building and its documents.
    DeleteBuilding { id: EntryId, reply: Reply<Folder> },
    /// Copy an external directory in as a building.
    ImportBuilding {
        source: PathBuf,
        reply: Reply<Folder>,
    },
    /// List the documents of a building.
    ListDocuments {
        building_id: EntryId,
        reply: Reply<Vec<Document>>,
    },
    /// Look up a document by display name within a building.
    DocumentByName {
        building_id: EntryId,
        name: String,
        reply: Reply<Option<Document>>,
    },
    /// Rename a document.
    RenameDocument {
        id: EntryId,
        new_name: String,
        reply: Reply<Document>,
    },
    /// Delete a document.
    DeleteDocument { id: EntryId, reply: Reply<Document> },
    /// Copy an external document into a building.
    ImportDocument {
        building_id: EntryId,
        source: PathBuf,
        reply: Reply<Document>,
    },
}

impl Command {
    /// Run the command against `library` and send the outcome back.
    ///
    /// A caller that stopped waiting is ignored; the operation still ran.
    pub fn apply(self, library: &mut Library) {
        match self {
            Self::Reload { reply } => {
                let _ = reply.send(library.reload());
            }
            Self::ListBuildings { reply } => {
                let _ = reply.send(Ok(library.list_buildings().to_vec()));
            }
            Self::BuildingByName { name, reply } => {
                let _ = reply.send(Ok(library.building_by_name(&name).cloned()));
            }
            Self::CreateBuilding { name, reply } => {
                let _ = reply.send(library.create_building(&name));
            }
            Self::RenameBuilding {
                id,
                new_name,
                reply,
            } => {
                let _ = reply.send(library.rename_building(id, &new_name));
            }
            Self::DeleteBuilding { id, reply } => {
                let _ = reply.send(library.delete_building(id));
            }
            Self::ImportBuilding { source, reply } => {
                let _ = reply.send(library.import_building(&source));
            }
            Self::ListDocuments { building_id, reply } => {
                let _ = reply.send(library.list_documents(building_id).map(<[Document]>::to_vec));
            }
            Self::DocumentByName {
                building_id,
                name,
                reply,
            } => {
                let result = library
                    .document_by_name(building_id, &name)
                    .map(|doc| doc.cloned());
                let _ = reply.send(result);
            }
            Self::RenameDocument {
                id,
                new_name,
                reply,
            } => {
                let _ = reply.send(library.rename_document(id, &new_name));
            }
            Self::DeleteDocument { id, reply } => {
                let _ = reply.send(library.delete_document(id));
            }
            Self::ImportDocument {
                building_id,
                source,
                reply,
            } => {
                let _ = reply.send(library.import_document(building_id, &source));
            }
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reload { .. } => "reload",
            Self::ListBuildings { .. } => "list buildings",
            Self::BuildingByName { .. } => "find building",
            Self::CreateBuilding { .. } => "create building",
            Self::RenameBuilding { .. } => "rename building",
            Self::DeleteBuilding { .. } => "delete building",
            Self::ImportBuilding { .. } => "import building",
            Self::ListDocuments { .. } => "list documents",
            Self::DocumentByName { .. } => "find document",
            Self::RenameDocument { .. } => "rename document",
            Self::DeleteDocument { .. } => "delete document",
            Self::ImportDocument { .. } => "import document",
        }
    }
}
