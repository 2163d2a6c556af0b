//! Building and document registries for floorplan.
//!
//! A registry owns an in-memory list of entries and keeps it reconciled with
//! the storage root: the directory tree is the source of truth and the list
//! is a cache that is only mutated after the matching disk operation has
//! succeeded.
//!
//! - [`FolderRegistry`] tracks the buildings directly under the root.
//! - [`FileRegistry`] tracks the documents inside one building.
//! - [`Importer`] copies externally picked files and folders in, holding a
//!   scoped [`AccessGuard`] for the duration of the copy.
//! - [`Library`] ties them together behind id-keyed operations.
//!
//! Every failing operation is logged with `tracing` before the error is
//! returned to the caller.

mod access;
mod files;
mod folders;
mod import;
mod library;

pub use access::{AccessBroker, AccessGuard, ReadableAccess, UnrestrictedAccess};
pub use files::FileRegistry;
pub use folders::FolderRegistry;
pub use import::Importer;
pub use library::Library;

use floorplan_core::Result;
use tracing::warn;

/// Log a failed operation at the registry boundary and pass the result on.
pub(crate) trait Report<T> {
    fn report(self, operation: &'static str) -> Result<T>;
}

impl<T> Report<T> for Result<T> {
    fn report(self, operation: &'static str) -> Result<T> {
        if let Err(e) = &self {
            warn!(operation, kind = %e.kind(), "{e}");
        }
        self
    }
}
