//! Scoped access grants for externally picked locations.

use std::path::{Path, PathBuf};

use floorplan_core::{Result, StoreError};
use tracing::debug;

/// Grants temporary read access to locations outside the storage root.
///
/// Every successful `begin_access` is paired with exactly one `end_access`
/// by [`AccessGuard`].
pub trait AccessBroker: Send + Sync {
    /// Request access to `path`. Returns `false` if the grant is refused.
    fn begin_access(&self, path: &Path) -> bool;

    /// Release a grant obtained from `begin_access`.
    fn end_access(&self, path: &Path);
}

/// Broker for platforms without sandboxing; every request is granted.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnrestrictedAccess;

impl AccessBroker for UnrestrictedAccess {
    fn begin_access(&self, _path: &Path) -> bool {
        true
    }

    fn end_access(&self, _path: &Path) {}
}

/// Broker that grants access only when the location's metadata is readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadableAccess;

impl AccessBroker for ReadableAccess {
    fn begin_access(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }

    fn end_access(&self, _path: &Path) {}
}

/// RAII guard that releases its grant exactly once when dropped.
pub struct AccessGuard<'a> {
    broker: &'a dyn AccessBroker,
    path: PathBuf,
}

impl<'a> AccessGuard<'a> {
    /// Acquire a grant for `path`, or fail with [`StoreError::AccessDenied`].
    pub fn acquire(broker: &'a dyn AccessBroker, path: &Path) -> Result<Self> {
        if !broker.begin_access(path) {
            return Err(StoreError::AccessDenied {
                path: path.to_path_buf(),
            });
        }

        debug!("Access granted for {}", path.display());
        Ok(Self {
            broker,
            path: path.to_path_buf(),
        })
    }

    /// The location this grant covers.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        self.broker.end_access(&self.path);
        debug!("Access released for {}", self.path.display());
    }
}

impl std::fmt::Debug for AccessGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        grant: bool,
        begun: AtomicUsize,
        ended: AtomicUsize,
    }

    impl AccessBroker for Counting {
        fn begin_access(&self, _path: &Path) -> bool {
            self.begun.fetch_add(1, Ordering::SeqCst);
            self.grant
        }

        fn end_access(&self, _path: &Path) {
            self.ended.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_guard_releases_once() {
        let broker = Counting {
            grant: true,
            ..Default::default()
        };

        {
            let guard = AccessGuard::acquire(&broker, Path::new("/external/plan.pdf")).unwrap();
            assert_eq!(guard.path(), Path::new("/external/plan.pdf"));
            assert_eq!(broker.ended.load(Ordering::SeqCst), 0);
        }

        assert_eq!(broker.begun.load(Ordering::SeqCst), 1);
        assert_eq!(broker.ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refused_grant_is_not_released() {
        let broker = Counting::default();

        let err = AccessGuard::acquire(&broker, Path::new("/external")).unwrap_err();
        assert!(matches!(err, StoreError::AccessDenied { .. }));
        assert_eq!(broker.ended.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_readable_access_requires_existing_path() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(ReadableAccess.begin_access(temp.path()));
        assert!(!ReadableAccess.begin_access(&temp.path().join("missing")));
    }
}
