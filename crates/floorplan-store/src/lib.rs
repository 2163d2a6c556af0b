//! Storage root accessor for floorplan.
//!
//! [`StorageRoot`] is a stateless wrapper around the file system calls the
//! registries need. Every operation is synchronous, works on one absolute
//! location, never retries, and either fully completes or leaves the
//! destination untouched.

mod accessor;
mod copy;
mod filter;

pub use accessor::{DirEntry, StorageRoot};
pub use filter::{EntryKind, ListFilter};
