//! Turn one diff entry into a fragment shaped like the source document.
//!
//! A fragment is a chain of single-key maps following the entry's path down
//! to the changed value. Lists are never represented sparsely: as soon as a
//! path enters a list, the whole list as it stands in the source document is
//! embedded at that point instead.

use snapdiff_types::Document;

use crate::engine::DiffEngine;
use crate::entry::DiffEntry;
use crate::error::{DiffError, Result};
use crate::path::{DiffPath, PathSegment};

/// Which side of a [`DiffEntry`] goes into the fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSelector {
    Value,
    OldValue,
}

impl DiffEngine {
    /// Build the fragment for `entry` against `source`.
    ///
    /// If the path crosses a list, the fragment carries the entire list found
    /// at the list's own path in `source`. If that path does not exist in
    /// `source` (the branch only exists on the other side), the fragment is
    /// an empty map. Descending through a node of the wrong kind is an
    /// [`DiffError::UnsupportedPath`].
    pub fn reconstruct(
        &self,
        entry: &DiffEntry,
        source: &Document,
        selector: ValueSelector,
    ) -> Result<Document> {
        let segments = entry.path.segments();
        let max_depth = self.options().max_depth;
        if segments.len() > max_depth {
            return Err(DiffError::DepthLimitExceeded {
                path: entry.path.to_string(),
                max_depth,
            });
        }

        match entry.path.first_index() {
            Some(position) => {
                let keys = &segments[..position];
                match resolve(source, keys)? {
                    None => Ok(Document::empty_map()),
                    Some(list @ Document::List(_)) => Ok(nest(keys, self.excluded().prune(list))),
                    Some(other) => Err(DiffError::UnsupportedPath {
                        path: DiffPath::new(keys.to_vec()).to_string(),
                        kind: other.kind(),
                    }),
                }
            }
            None => {
                let leaf = match selector {
                    ValueSelector::Value => &entry.value,
                    ValueSelector::OldValue => entry
                        .old_value
                        .as_ref()
                        .ok_or_else(|| DiffError::MissingOldValue(entry.path.to_string()))?,
                };
                if let Some((_, ancestors)) = segments.split_last() {
                    match resolve(source, ancestors)? {
                        None => return Ok(Document::empty_map()),
                        Some(Document::Map(_)) => {}
                        Some(other) => {
                            return Err(DiffError::UnsupportedPath {
                                path: DiffPath::new(ancestors.to_vec()).to_string(),
                                kind: other.kind(),
                            })
                        }
                    }
                }
                Ok(nest(segments, self.excluded().prune(leaf)))
            }
        }
    }
}

/// Follow `segments` from `source`. `Ok(None)` when a key or index is absent.
fn resolve<'d>(source: &'d Document, segments: &[PathSegment]) -> Result<Option<&'d Document>> {
    let mut node = source;
    for (depth, segment) in segments.iter().enumerate() {
        let next = match (node, segment) {
            (Document::Map(map), PathSegment::Key(key)) => map.get(key),
            (Document::List(items), PathSegment::Index(index)) => items.get(*index),
            _ => {
                return Err(DiffError::UnsupportedPath {
                    path: DiffPath::new(segments[..depth].to_vec()).to_string(),
                    kind: node.kind(),
                })
            }
        };
        match next {
            Some(child) => node = child,
            None => return Ok(None),
        }
    }
    Ok(Some(node))
}

/// Wrap `leaf` in one single-key map per key segment, innermost last.
fn nest(keys: &[PathSegment], leaf: Document) -> Document {
    // Callers only pass the key prefix that precedes any index.
    keys.iter()
        .rev()
        .filter_map(PathSegment::as_key)
        .fold(leaf, |inner, key| {
            Document::Map([(key.to_string(), inner)].into_iter().collect())
        })
}
