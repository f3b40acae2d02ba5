use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use snapdiff_types::{Document, Snapshot};

use crate::error::{StoreError, StoreResult};
use crate::traits::SnapshotStore;

/// In-memory, HashMap-based snapshot store.
///
/// Intended for tests and embedding. Snapshots are held behind a `RwLock`
/// and cloned on read/write. The store can be switched to an unavailable
/// state to exercise error paths of its callers.
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<String, Snapshot>>,
    unavailable: AtomicBool,
}

impl InMemorySnapshotStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Number of snapshots currently stored.
    pub fn len(&self) -> usize {
        self.snapshots.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().expect("lock poisoned").is_empty()
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".into()));
        }
        Ok(())
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn fetch_previous(&self, id: &str) -> StoreResult<Option<Snapshot>> {
        self.check_available()?;
        let map = self.snapshots.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn save(&self, id: &str, last_modified: &str, snapshot: &Document) -> StoreResult<()> {
        self.check_available()?;
        let mut map = self.snapshots.write().expect("lock poisoned");
        map.insert(
            id.to_string(),
            Snapshot::new(id, last_modified, snapshot.clone()),
        );
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        self.check_available()?;
        let mut map = self.snapshots.write().expect("lock poisoned");
        Ok(map.remove(id).is_some())
    }

    fn ids(&self) -> StoreResult<Vec<String>> {
        self.check_available()?;
        let map = self.snapshots.read().expect("lock poisoned");
        let mut ids: Vec<String> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn contains(&self, id: &str) -> StoreResult<bool> {
        self.check_available()?;
        let map = self.snapshots.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySnapshotStore")
            .field("snapshot_count", &self.len())
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(title: &str) -> Document {
        Document::from_json(&json!({"properties": {"Name": title}})).unwrap()
    }

    #[test]
    fn missing_id_reads_as_none() {
        let store = InMemorySnapshotStore::new();
        assert!(store.fetch_previous("p1").unwrap().is_none());
        assert!(!store.contains("p1").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_fetch() {
        let store = InMemorySnapshotStore::new();
        store.save("p1", "2024-01-05T00:00:00.000Z", &page("a")).unwrap();

        let stored = store.fetch_previous("p1").unwrap().unwrap();
        assert_eq!(stored.id, "p1");
        assert_eq!(stored.last_edited_time, "2024-01-05T00:00:00.000Z");
        assert_eq!(stored.document, page("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn save_replaces_previous() {
        let store = InMemorySnapshotStore::new();
        store.save("p1", "t1", &page("a")).unwrap();
        store.save("p1", "t2", &page("b")).unwrap();

        let stored = store.fetch_previous("p1").unwrap().unwrap();
        assert_eq!(stored.last_edited_time, "t2");
        assert_eq!(stored.document, page("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_and_ids() {
        let store = InMemorySnapshotStore::new();
        store.save("b", "t", &page("b")).unwrap();
        store.save("a", "t", &page("a")).unwrap();
        assert_eq!(store.ids().unwrap(), vec!["a".to_string(), "b".to_string()]);

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.ids().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn unavailable_store_fails_every_operation() {
        let store = InMemorySnapshotStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.fetch_previous("p1"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.save("p1", "t", &page("a")), Err(StoreError::Unavailable(_))));

        store.set_unavailable(false);
        assert!(store.save("p1", "t", &page("a")).is_ok());
    }

    #[test]
    fn concurrent_saves() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemorySnapshotStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.save(&format!("p{i}"), "t", &page("x")).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }
}
