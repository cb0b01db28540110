//! Process-local invalidation for cached department views.
//!
//! Mutations bump a revision counter; read endpoints publish it so clients
//! and intermediaries holding an older revision know to refetch.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::domain::ports::CollectionRefresh;

/// Monotonic revision counter for the department collection.
#[derive(Debug, Default)]
pub struct RevisionTracker {
    departments: AtomicU64,
}

impl RevisionTracker {
    /// Create a tracker at revision zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionRefresh for RevisionTracker {
    fn departments_changed(&self) {
        let revision = self.departments.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(revision, "department collection invalidated");
    }

    fn departments_revision(&self) -> u64 {
        self.departments.load(Ordering::Acquire)
    }
}
