use serde::{Deserialize, Serialize};
use snapdiff_diff::{ChangedFragments, DiffResult};
use snapdiff_types::Document;

use crate::error::{NotifyError, NotifyResult};

/// Wire payload sent to subscribers:
///
/// ```json
/// {
///   "id": "<document id>",
///   "last_edited_time": "<ISO-8601 timestamp>",
///   "added": {},
///   "changed": {"old": {}, "new": {}},
///   "deleted": {}
/// }
/// ```
///
/// `changed` is `{}` when nothing changed in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub id: String,
    pub last_edited_time: String,
    pub added: Document,
    pub changed: ChangedFragments,
    pub deleted: Document,
}

impl ChangeNotification {
    pub fn new(id: impl Into<String>, last_edited_time: impl Into<String>, diff: DiffResult) -> Self {
        Self {
            id: id.into(),
            last_edited_time: last_edited_time.into(),
            added: diff.added,
            changed: diff.changed,
            deleted: diff.deleted,
        }
    }

    /// Returns `true` if the payload describes no change at all. Such a
    /// payload should not be delivered.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty_map() && self.changed.is_empty() && self.deleted.is_empty_map()
    }

    pub fn to_json(&self) -> NotifyResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| NotifyError::Serialization(e.to_string()))
    }
}
