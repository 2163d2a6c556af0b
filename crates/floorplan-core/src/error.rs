//! Error types for library operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::entry::EntryId;

/// Convenience alias used across the floorplan crates.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors that can occur while managing buildings and documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file system failure.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A building with this name is already cached or present on disk.
    #[error("A building named '{}' already exists", path.display())]
    NameCollision { path: PathBuf },

    /// A copy, move or directory creation found its destination occupied.
    #[error("Destination {} already exists", path.display())]
    DestinationExists { path: PathBuf },

    /// The requested name cannot be used on disk.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The source is not the kind of entry the operation accepts.
    #[error("Unsupported entry: {}", path.display())]
    UnsupportedType { path: PathBuf },

    /// The scoped access grant for an external location was refused.
    #[error("Access to {} was not granted", path.display())]
    AccessDenied { path: PathBuf },

    /// No building or document carries this id.
    #[error("No entry with id {id}")]
    UnknownEntry { id: EntryId },

    /// The mutation queue has shut down.
    #[error("Library service is no longer running")]
    ServiceClosed,
}

impl StoreError {
    /// Create an I/O error with path context.
    ///
    /// `AlreadyExists` is reported as a [`StoreError::DestinationExists`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::AlreadyExists => Self::DestinationExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. }
            | Self::DestinationExists { .. }
            | Self::UnsupportedType { .. }
            | Self::AccessDenied { .. } => ErrorKind::IoFailure,
            Self::ServiceClosed => ErrorKind::IoFailure,
            Self::NameCollision { .. } => ErrorKind::NameCollision,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::UnknownEntry { .. } => ErrorKind::NotFound,
        }
    }
}

/// Kind of failure surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// The file system or access grant refused the operation.
    IoFailure,
    /// A new building's resolved location is already taken.
    NameCollision,
    /// The supplied name is unusable.
    InvalidName,
    /// The id does not refer to a known entry.
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_already_exists_is_destination_exists() {
        let err = StoreError::io(
            "/root/Tower A",
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
        );
        assert!(matches!(err, StoreError::DestinationExists { .. }));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn test_only_building_precheck_is_name_collision() {
        let err = StoreError::NameCollision {
            path: PathBuf::from("/root/Tower A"),
        };
        assert_eq!(err.kind(), ErrorKind::NameCollision);
    }

    #[test]
    fn test_permission_denied_is_io_failure() {
        let err = StoreError::io(
            "/root",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(err.to_string().contains("/root"));
    }

    #[test]
    fn test_access_denied_reports_as_io_failure() {
        let err = StoreError::AccessDenied {
            path: PathBuf::from("/external/plan.pdf"),
        };
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::NameCollision.to_string(), "name-collision");
        assert_eq!("io-failure".parse::<ErrorKind>().ok(), Some(ErrorKind::IoFailure));
    }
}
