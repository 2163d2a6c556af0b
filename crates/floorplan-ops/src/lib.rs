//! Serialized library operations for floorplan.
//!
//! A [`Library`](floorplan_registry::Library) must only be mutated by one
//! caller at a time. This crate moves it onto a dedicated blocking task and
//! hands out cloneable [`LibraryHandle`]s that queue [`Command`]s over a
//! bounded channel. Commands run strictly in arrival order, one at a time.

mod command;
mod service;

pub use command::{Command, Reply};
pub use service::{LibraryHandle, LibraryService};

/// Capacity of the command queue.
pub const SERVICE_CHANNEL_SIZE: usize = 100;
