use crate::config::CacheWindows;
use crate::models::ChannelSnapshot;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// Holds at most one snapshot. Implementations decide freshness from the
/// snapshot's own `computed_at` and `degraded` flag.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, now: DateTime<Utc>) -> Option<ChannelSnapshot>;

    fn put(&self, snapshot: ChannelSnapshot);
}

pub struct SnapshotCache {
    current: RwLock<Option<ChannelSnapshot>>,
    windows: CacheWindows,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(CacheWindows::default())
    }
}

impl SnapshotCache {
    pub fn new(windows: CacheWindows) -> Self {
        SnapshotCache {
            current: RwLock::new(None),
            windows,
        }
    }

    pub fn is_fresh(&self, snapshot: &ChannelSnapshot, now: DateTime<Utc>) -> bool {
        now - snapshot.computed_at < self.windows.for_snapshot(snapshot.degraded)
    }
}

impl SnapshotStore for SnapshotCache {
    fn get(&self, now: DateTime<Utc>) -> Option<ChannelSnapshot> {
        if let Ok(current) = self.current.read() {
            current
                .as_ref()
                .filter(|snapshot| self.is_fresh(snapshot, now))
                .cloned()
        } else {
            None
        }
    }

    fn put(&self, snapshot: ChannelSnapshot) {
        if let Ok(mut current) = self.current.write() {
            *current = Some(snapshot);
        }
    }
}
