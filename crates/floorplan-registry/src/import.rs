//! Import pipeline for externally picked files and folders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use floorplan_core::{has_extension, Result, StoreError};
use floorplan_store::StorageRoot;
use tracing::info;

use crate::access::{AccessBroker, AccessGuard, UnrestrictedAccess};

/// Copies picked sources into the storage root.
///
/// Sources already inside the storage root are copied without a grant;
/// anything else is wrapped in an [`AccessGuard`] that is released on every
/// exit path, including a failed copy.
#[derive(Clone)]
pub struct Importer {
    broker: Arc<dyn AccessBroker>,
}

impl Importer {
    /// Create an importer backed by `broker`.
    pub fn new(broker: Arc<dyn AccessBroker>) -> Self {
        Self { broker }
    }

    /// Copy a single document of type `extension` into `folder`.
    pub fn import_document(
        &self,
        storage: &StorageRoot,
        source: &Path,
        folder: &Path,
        extension: &str,
    ) -> Result<PathBuf> {
        self.import_with(storage, source, folder, |source| {
            source.is_file() && has_extension(source, extension)
        })
    }

    /// Copy a whole directory tree into the storage root as a new building.
    pub fn import_folder(&self, storage: &StorageRoot, source: &Path) -> Result<PathBuf> {
        self.import_with(storage, source, storage.root(), Path::is_dir)
    }

    fn import_with(
        &self,
        storage: &StorageRoot,
        source: &Path,
        destination_dir: &Path,
        accepts: impl Fn(&Path) -> bool,
    ) -> Result<PathBuf> {
        let _guard = if source.starts_with(storage.root()) {
            None
        } else {
            Some(AccessGuard::acquire(self.broker.as_ref(), source)?)
        };

        let name = source_name(source)?;

        if !accepts(source) {
            return Err(StoreError::UnsupportedType {
                path: source.to_path_buf(),
            });
        }

        let destination = destination_dir.join(name);
        let bytes = storage.copy_entry(source, &destination)?;

        info!(
            "Imported {} to {} ({} bytes)",
            source.display(),
            destination.display(),
            bytes
        );
        Ok(destination)
    }
}

/// The last path segment of a picked source, as the name it will carry
/// inside the storage root.
pub(crate) fn source_name(source: &Path) -> Result<&str> {
    let name = source.file_name().ok_or_else(|| StoreError::UnsupportedType {
        path: source.to_path_buf(),
    })?;

    name.to_str().ok_or_else(|| {
        StoreError::invalid_name(name.to_string_lossy(), "name is not valid UTF-8")
    })
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(Arc::new(UnrestrictedAccess))
    }
}

impl std::fmt::Debug for Importer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Importer").finish_non_exhaustive()
    }
}
