//! Merge per-entry fragments into the three-way diff result.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snapdiff_types::Document;
use tracing::debug;

use crate::engine::DiffEngine;
use crate::entry::{DiffAction, DiffEntry};
use crate::error::Result;
use crate::reconstruct::ValueSelector;

/// What changed between two snapshots.
///
/// Each tree is either an empty map or a partial document that mirrors the
/// compared documents' shape, holding values only along changed paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub added: Document,
    pub changed: ChangedFragments,
    pub deleted: Document,
}

/// The two sides of changed values: `old` from the previous snapshot, `new`
/// from the current one.
///
/// Serializes as `{}` when both sides are empty, otherwise as
/// `{"old": …, "new": …}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangedFragments {
    pub old: Document,
    pub new: Document,
}

impl ChangedFragments {
    pub fn is_empty(&self) -> bool {
        self.old.is_empty_map() && self.new.is_empty_map()
    }
}

impl Default for ChangedFragments {
    fn default() -> Self {
        Self {
            old: Document::empty_map(),
            new: Document::empty_map(),
        }
    }
}

impl Serialize for ChangedFragments {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_empty() {
            return serializer.serialize_map(Some(0))?.end();
        }
        let mut state = serializer.serialize_struct("ChangedFragments", 2)?;
        state.serialize_field("old", &self.old)?;
        state.serialize_field("new", &self.new)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct RawChangedFragments {
    #[serde(default = "Document::empty_map")]
    old: Document,
    #[serde(default = "Document::empty_map")]
    new: Document,
}

impl<'de> Deserialize<'de> for ChangedFragments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawChangedFragments::deserialize(deserializer)?;
        Ok(Self {
            old: raw.old,
            new: raw.new,
        })
    }
}

impl DiffResult {
    /// Returns `true` when nothing was added, changed, or deleted. Callers
    /// use this to suppress outbound notifications.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty_map() && self.changed.is_empty() && self.deleted.is_empty_map()
    }
}

impl Default for DiffResult {
    fn default() -> Self {
        Self {
            added: Document::empty_map(),
            changed: ChangedFragments::default(),
            deleted: Document::empty_map(),
        }
    }
}

impl DiffEngine {
    /// Reconstruct every entry and merge the fragments.
    ///
    /// - `ItemAdded` goes to `added`, built against `current`.
    /// - `ItemRemoved` goes to `deleted`, built against `previous`.
    /// - `ValueChanged` and both iterable actions go to `changed`: `old`
    ///   built against `previous`, `new` against `current`. For list
    ///   changes both sides carry the full list.
    pub fn assemble(
        &self,
        entries: &[DiffEntry],
        previous: &Document,
        current: &Document,
    ) -> Result<DiffResult> {
        let mut result = DiffResult::default();

        for entry in entries {
            debug!(path = %entry.path, action = ?entry.action, "assembling diff entry");
            match entry.action {
                DiffAction::ItemAdded => {
                    let fragment = self.reconstruct(entry, current, ValueSelector::Value)?;
                    merge_into(&mut result.added, fragment);
                }
                DiffAction::ItemRemoved => {
                    let fragment = self.reconstruct(entry, previous, ValueSelector::Value)?;
                    merge_into(&mut result.deleted, fragment);
                }
                DiffAction::ValueChanged => {
                    let old = self.reconstruct(entry, previous, ValueSelector::OldValue)?;
                    let new = self.reconstruct(entry, current, ValueSelector::Value)?;
                    merge_into(&mut result.changed.old, old);
                    merge_into(&mut result.changed.new, new);
                }
                DiffAction::IterableItemAdded | DiffAction::IterableItemRemoved => {
                    let old = self.reconstruct(entry, previous, ValueSelector::Value)?;
                    let new = self.reconstruct(entry, current, ValueSelector::Value)?;
                    merge_into(&mut result.changed.old, old);
                    merge_into(&mut result.changed.new, new);
                }
            }
        }

        debug!(entries = entries.len(), empty = result.is_empty(), "assembled diff result");
        Ok(result)
    }
}

/// Deep-merge `fragment` into `target`.
///
/// Maps union their keys recursively. Anything else (scalars, lists, or a
/// map meeting a non-map) is overwritten by the later fragment.
fn merge_into(target: &mut Document, fragment: Document) {
    match (target, fragment) {
        (Document::Map(into), Document::Map(from)) => {
            for (key, value) in from {
                match into.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        into.insert(key, value);
                    }
                }
            }
        }
        (target, fragment) => *target = fragment,
    }
}
