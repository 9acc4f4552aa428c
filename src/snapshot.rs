use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::services::LightningSummary;

/// Last successful lightning result and the map rendered from it
#[derive(Debug)]
pub struct LightningSnapshot {
    pub summary: LightningSummary,
    pub map_html: String,
    pub updated_at: DateTime<Utc>,
}

/// Single-slot store for the most recent [`LightningSnapshot`].
///
/// Publishing replaces the whole snapshot; readers get a shared handle to an
/// immutable value and never observe a half-written update.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    slot: RwLock<Option<Arc<LightningSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: LightningSnapshot) -> Arc<LightningSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn latest(&self) -> Option<Arc<LightningSnapshot>> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.latest().map(|s| s.updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::LIGHTNING_DISPLAY_BOUNDS;

    fn snapshot(html: &str) -> LightningSnapshot {
        let now = Utc::now();
        let mut summary = LightningSummary::failure("unused", LIGHTNING_DISPLAY_BOUNDS, now);
        summary.success = true;
        summary.error = None;
        LightningSnapshot {
            summary,
            map_html: html.to_string(),
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::new();
        assert!(store.latest().is_none());
        assert!(store.last_update().is_none());
    }

    #[test]
    fn test_publish_replaces_previous() {
        let store = SnapshotStore::new();
        let first = store.publish(snapshot("<p>first</p>"));
        store.publish(snapshot("<p>second</p>"));

        let latest = store.latest().unwrap();
        assert_eq!(latest.map_html, "<p>second</p>");
        // Earlier handles stay valid and unchanged
        assert_eq!(first.map_html, "<p>first</p>");
    }
}
