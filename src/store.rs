//! In-memory snapshot store shared between the refresh driver and the API.

use std::sync::{Arc, RwLock};

use crate::types::ScheduleSnapshot;

/// Holds exactly one immutable snapshot, swapped atomically by the refresh
/// driver. Readers get the latest fully-built snapshot or `None` before the
/// first successful scrape; they never observe a partially-built one.
#[derive(Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<ScheduleSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot wholesale.
    pub fn replace(&self, snapshot: ScheduleSnapshot) {
        let mut guard = self.current.write().expect("snapshot store poisoned");
        *guard = Some(Arc::new(snapshot));
    }

    /// The latest complete snapshot, if any scrape has succeeded yet.
    pub fn current(&self) -> Option<Arc<ScheduleSnapshot>> {
        self.current
            .read()
            .expect("snapshot store poisoned")
            .clone()
    }
}
