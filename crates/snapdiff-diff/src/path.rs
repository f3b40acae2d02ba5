//! Paths locating a value inside a document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a [`DiffPath`]: a map key or a list index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// The ordered segments leading from the document root to a value.
///
/// Serializes as a plain JSON array, e.g. `["properties", "tags", 0]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffPath(Vec<PathSegment>);

impl DiffPath {
    /// The empty path (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy of this path extended by one segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// The final segment, if it is a map key.
    pub fn terminal_key(&self) -> Option<&str> {
        self.last().and_then(PathSegment::as_key)
    }

    /// Position of the first list index along the path.
    pub fn first_index(&self) -> Option<usize> {
        self.0.iter().position(PathSegment::is_index)
    }
}

impl FromIterator<PathSegment> for DiffPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for DiffPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Build a [`DiffPath`] from keys and indices: `diff_path!["tags", 0, "name"]`.
#[macro_export]
macro_rules! diff_path {
    ($($segment:expr),* $(,)?) => {
        $crate::DiffPath::new(vec![$($crate::PathSegment::from($segment)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mixes_keys_and_indices() {
        let path = diff_path!["properties", "tags", 0usize, "name"];
        assert_eq!(path.to_string(), "properties.tags[0].name");
        assert_eq!(DiffPath::root().to_string(), "(root)");
    }

    #[test]
    fn terminal_key_and_first_index() {
        let path = diff_path!["tags", 2usize, "name"];
        assert_eq!(path.terminal_key(), Some("name"));
        assert_eq!(path.first_index(), Some(1));

        let list_slot = diff_path!["tags", 2usize];
        assert_eq!(list_slot.terminal_key(), None);

        assert_eq!(diff_path!["a", "b"].first_index(), None);
    }

    #[test]
    fn child_does_not_modify_parent() {
        let parent = diff_path!["a"];
        let child = parent.child(3usize);
        assert_eq!(parent.len(), 1);
        assert_eq!(child, diff_path!["a", 3usize]);
    }

    #[test]
    fn serializes_as_flat_array() {
        let path = diff_path!["properties", 0usize];
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["properties", 0]));
    }
}
