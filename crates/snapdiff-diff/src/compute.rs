//! Lock-step comparison of two documents.
//!
//! Maps are compared by key, lists by position. A key or index whose values
//! are both maps or both lists is descended into; any other inequality,
//! including a change of kind, is reported as a single `ValueChanged`.
//! Excluded keys are skipped wherever they occur.

use snapdiff_types::Document;
use tracing::debug;

use crate::config::ExclusionSet;
use crate::engine::DiffEngine;
use crate::entry::DiffEntry;
use crate::error::{DiffError, Result};
use crate::path::{DiffPath, PathSegment};

impl DiffEngine {
    /// Compute every leaf-level difference between `previous` and `current`.
    ///
    /// Entries come out in walk order: for each map, removed and shared keys
    /// in key order, then added keys; for each list, ascending index. The
    /// result is empty when the documents are equal modulo exclusions.
    pub fn compute(&self, previous: &Document, current: &Document) -> Result<Vec<DiffEntry>> {
        let mut walker = Walker {
            excluded: self.excluded(),
            max_depth: self.options().max_depth,
            entries: Vec::new(),
        };
        let mut path = Vec::new();
        walker.compare(previous, current, &mut path)?;

        debug!(entries = walker.entries.len(), "computed diff entries");
        Ok(walker.entries)
    }
}

struct Walker<'a> {
    excluded: &'a ExclusionSet,
    max_depth: usize,
    entries: Vec<DiffEntry>,
}

impl Walker<'_> {
    fn compare(
        &mut self,
        previous: &Document,
        current: &Document,
        path: &mut Vec<PathSegment>,
    ) -> Result<()> {
        if previous == current {
            return Ok(());
        }
        match (previous, current) {
            (Document::Map(old), Document::Map(new)) => {
                self.enter(path)?;
                for (key, old_value) in old {
                    if self.excluded.contains(key) {
                        continue;
                    }
                    path.push(PathSegment::Key(key.clone()));
                    match new.get(key) {
                        Some(new_value) => self.compare(old_value, new_value, path)?,
                        None => {
                            let value = self.excluded.prune(old_value);
                            self.entries.push(DiffEntry::removed(current_path(path), value));
                        }
                    }
                    path.pop();
                }
                for (key, new_value) in new {
                    if self.excluded.contains(key) || old.contains_key(key) {
                        continue;
                    }
                    path.push(PathSegment::Key(key.clone()));
                    let value = self.excluded.prune(new_value);
                    self.entries.push(DiffEntry::added(current_path(path), value));
                    path.pop();
                }
            }
            (Document::List(old), Document::List(new)) => {
                self.enter(path)?;
                for index in 0..old.len().max(new.len()) {
                    path.push(PathSegment::Index(index));
                    match (old.get(index), new.get(index)) {
                        (Some(old_item), Some(new_item)) => {
                            self.compare(old_item, new_item, path)?
                        }
                        (None, Some(new_item)) => {
                            let value = self.excluded.prune(new_item);
                            self.entries
                                .push(DiffEntry::iterable_added(current_path(path), value));
                        }
                        (Some(old_item), None) => {
                            let value = self.excluded.prune(old_item);
                            self.entries
                                .push(DiffEntry::iterable_removed(current_path(path), value));
                        }
                        (None, None) => {}
                    }
                    path.pop();
                }
            }
            _ => {
                self.entries.push(DiffEntry::changed(
                    current_path(path),
                    self.excluded.prune(previous),
                    self.excluded.prune(current),
                ));
            }
        }
        Ok(())
    }

    fn enter(&self, path: &[PathSegment]) -> Result<()> {
        if path.len() >= self.max_depth {
            return Err(DiffError::DepthLimitExceeded {
                path: current_path(path).to_string(),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}

fn current_path(path: &[PathSegment]) -> DiffPath {
    DiffPath::new(path.to_vec())
}
