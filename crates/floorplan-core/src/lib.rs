//! Core types for floorplan.
//!
//! This crate provides the value types shared by every other floorplan crate:
//! buildings ([`Folder`]) and their documents ([`Document`]), the session-local
//! [`EntryId`] that identifies them, the [`LibraryConfig`] describing where the
//! storage root lives, and the [`StoreError`] taxonomy.
//!
//! Nothing in here touches the disk except [`LibraryConfig::load`]. Creating
//! the backing directory of a folder is the registry's job, not the
//! constructor's.

mod config;
mod entry;
mod error;
mod name;

pub use config::{LibraryConfig, LibraryConfigBuilder, DEFAULT_DOCUMENT_EXTENSION, DEFAULT_ROOT_NAME};
pub use entry::{sort_by_display_name, Document, Entry, EntryId, Folder};
pub use error::{ErrorKind, Result, StoreError};
pub use name::{has_extension, is_hidden, validate_name, MAX_NAME_LEN};
