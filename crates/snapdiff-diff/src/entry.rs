//! Atomic differences between two documents.

use serde::{Deserialize, Serialize};
use snapdiff_types::Document;

use crate::path::DiffPath;

/// What happened at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffAction {
    /// A map key exists only in the current document.
    ItemAdded,
    /// A map key exists only in the previous document.
    ItemRemoved,
    /// A leaf value differs, or the value changed kind.
    ValueChanged,
    /// The current list is longer; this index is new.
    IterableItemAdded,
    /// The previous list was longer; this index is gone.
    IterableItemRemoved,
}

/// One detected difference, in flat form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: DiffPath,
    pub action: DiffAction,
    /// The current value, or the removed value for removals.
    pub value: Document,
    /// The previous value; only set for [`DiffAction::ValueChanged`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Document>,
}

impl DiffEntry {
    pub fn added(path: DiffPath, value: Document) -> Self {
        Self {
            path,
            action: DiffAction::ItemAdded,
            value,
            old_value: None,
        }
    }

    pub fn removed(path: DiffPath, value: Document) -> Self {
        Self {
            path,
            action: DiffAction::ItemRemoved,
            value,
            old_value: None,
        }
    }

    pub fn changed(path: DiffPath, old_value: Document, value: Document) -> Self {
        Self {
            path,
            action: DiffAction::ValueChanged,
            value,
            old_value: Some(old_value),
        }
    }

    pub fn iterable_added(path: DiffPath, value: Document) -> Self {
        Self {
            path,
            action: DiffAction::IterableItemAdded,
            value,
            old_value: None,
        }
    }

    pub fn iterable_removed(path: DiffPath, value: Document) -> Self {
        Self {
            path,
            action: DiffAction::IterableItemRemoved,
            value,
            old_value: None,
        }
    }
}
