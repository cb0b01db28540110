//! Signal that cached views of the department collection are stale.

/// Page/cache layer notified after department mutations commit upstream.
#[cfg_attr(test, mockall::automock)]
pub trait CollectionRefresh: Send + Sync {
    /// The department collection changed; cached views must refresh.
    fn departments_changed(&self);

    /// Monotonic revision of the department collection as seen by this
    /// process.
    fn departments_revision(&self) -> u64;
}

/// Refresh signal that discards notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCollectionRefresh;

impl CollectionRefresh for NoOpCollectionRefresh {
    fn departments_changed(&self) {}

    fn departments_revision(&self) -> u64 {
        0
    }
}
