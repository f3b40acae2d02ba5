use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use snapdiff_types::{Document, Snapshot};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::SnapshotStore;

const EXTENSION: &str = "json";

/// Directory-backed snapshot store: `<root>/<id>.json` per document.
///
/// Each file holds `{"id", "last_edited_time", "snapshot"}`. Every write
/// goes to its own temporary file in the same directory and is renamed into
/// place, so a reader never sees a half-written snapshot and concurrent
/// writers for one id never share a temporary file. Ids are restricted to ASCII letters, digits,
/// `-` and `_`.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    root: PathBuf,
}

impl FileSnapshotStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn fetch_previous(&self, id: &str) -> StoreResult<Option<Snapshot>> {
        let path = self.path_for(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot = serde_json::from_str(&text)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))?;
        Ok(Some(snapshot))
    }

    fn save(&self, id: &str, last_modified: &str, snapshot: &Document) -> StoreResult<()> {
        let path = self.path_for(id)?;
        let record = Snapshot::new(id, last_modified, snapshot.clone());
        let bytes =
            serde_json::to_vec(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(id, bytes = bytes.len(), "saved snapshot");
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn ids(&self) -> StoreResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.path_for(id)?.is_file())
    }
}
