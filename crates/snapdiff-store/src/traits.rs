use snapdiff_types::{Document, Snapshot};

use crate::error::StoreResult;

/// Persistence for the previous snapshot of each watched document.
///
/// All implementations must satisfy these invariants:
/// - `fetch_previous` returns exactly what the last `save` for the id stored.
/// - An id that was never saved (or was deleted) reads as `Ok(None)`.
/// - Concurrent calls are safe; the last `save` for an id wins.
/// - All backend errors are propagated, never silently ignored.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot for `id`.
    ///
    /// Returns `Ok(None)` if nothing was stored yet.
    fn fetch_previous(&self, id: &str) -> StoreResult<Option<Snapshot>>;

    /// Store `snapshot` as the latest version of `id`, replacing any previous one.
    fn save(&self, id: &str, last_modified: &str, snapshot: &Document) -> StoreResult<()>;

    /// Remove the snapshot for `id`. Returns `true` if one existed.
    fn delete(&self, id: &str) -> StoreResult<bool>;

    /// All stored ids, sorted.
    fn ids(&self) -> StoreResult<Vec<String>>;

    /// Returns `true` if a snapshot is stored for `id`.
    ///
    /// Default implementation reads the snapshot. Backends may override it
    /// with a cheaper existence check.
    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.fetch_previous(id)?.is_some())
    }
}
