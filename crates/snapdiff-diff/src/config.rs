use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use snapdiff_types::{Document, DEFAULT_MAX_DEPTH};

/// Field name excluded by the reference deployment.
pub const LAST_EDITED_TIME: &str = "last_edited_time";

/// Field names the diff ignores, at any depth.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// `{"last_edited_time"}`: the timestamp changes on every edit and would
    /// otherwise show up in every diff.
    pub fn reference() -> Self {
        Self::new([LAST_EDITED_TIME])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.0
    }

    /// Copy `document` with every excluded key removed.
    pub fn prune(&self, document: &Document) -> Document {
        if self.0.is_empty() {
            document.clone()
        } else {
            document.without_keys(&self.0)
        }
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Tunables of the diff engine besides the exclusion list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Maximum path length walked during comparison and reconstruction.
    pub max_depth: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
