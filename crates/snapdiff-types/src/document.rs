use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TypeError;
use crate::number::Number;

/// Default bound on container nesting accepted from untrusted input.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A semi-structured document: one snapshot of a remote entity.
///
/// Maps are kept in key order, which makes every walk over a document
/// deterministic. Equality is structural, with numbers compared by value at
/// every depth (see [`Number`]).
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Document>),
    Map(BTreeMap<String, Document>),
}

/// The tag of a [`Document`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Null,
    Bool,
    Number,
    String,
    List,
    Map,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

impl Document {
    /// An empty map, the "nothing here" fragment.
    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Convert a JSON value, rejecting nesting deeper than [`DEFAULT_MAX_DEPTH`].
    pub fn from_json(value: &Value) -> Result<Self, TypeError> {
        Self::from_json_with_depth(value, DEFAULT_MAX_DEPTH)
    }

    /// Convert a JSON value, rejecting nesting deeper than `max_depth`.
    pub fn from_json_with_depth(value: &Value, max_depth: usize) -> Result<Self, TypeError> {
        convert(value, 0, max_depth)
    }

    /// Parse JSON text into a document.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TypeError::Malformed(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Convert back into a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.as_json().clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Null => DocumentKind::Null,
            Self::Bool(_) => DocumentKind::Bool,
            Self::Number(_) => DocumentKind::Number,
            Self::String(_) => DocumentKind::String,
            Self::List(_) => DocumentKind::List,
            Self::Map(_) => DocumentKind::Map,
        }
    }

    /// Returns `true` for lists and maps.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Returns `true` if this is a map with no entries.
    pub fn is_empty_map(&self) -> bool {
        matches!(self, Self::Map(map) if map.is_empty())
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Document]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key if this is a map.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Container nesting depth: 0 for scalars, 1 for a flat list or map.
    pub fn depth(&self) -> usize {
        match self {
            Self::List(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            Self::Map(map) => 1 + map.values().map(Self::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Deep copy with every map entry whose key is in `keys` removed, at any depth.
    pub fn without_keys(&self, keys: &BTreeSet<String>) -> Document {
        match self {
            Self::List(items) => Self::List(items.iter().map(|v| v.without_keys(keys)).collect()),
            Self::Map(map) => Self::Map(
                map.iter()
                    .filter(|(k, _)| !keys.contains(*k))
                    .map(|(k, v)| (k.clone(), v.without_keys(keys)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Returns `true` if a map entry named `key` exists anywhere in the document.
    pub fn contains_key_anywhere(&self, key: &str) -> bool {
        match self {
            Self::List(items) => items.iter().any(|v| v.contains_key_anywhere(key)),
            Self::Map(map) => {
                map.contains_key(key) || map.values().any(|v| v.contains_key_anywhere(key))
            }
            _ => false,
        }
    }
}

fn convert(value: &Value, depth: usize, max_depth: usize) -> Result<Document, TypeError> {
    let nested = depth + 1;
    match value {
        Value::Null => Ok(Document::Null),
        Value::Bool(b) => Ok(Document::Bool(*b)),
        Value::Number(n) => Ok(Document::Number(Number::from(n.clone()))),
        Value::String(s) => Ok(Document::String(s.clone())),
        Value::Array(_) | Value::Object(_) if nested > max_depth => {
            Err(TypeError::TooDeep { max_depth })
        }
        Value::Array(items) => items
            .iter()
            .map(|v| convert(v, nested, max_depth))
            .collect::<Result<Vec<_>, _>>()
            .map(Document::List),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), convert(v, nested, max_depth)?)))
            .collect::<Result<BTreeMap<_, _>, TypeError>>()
            .map(Document::Map),
    }
}

impl TryFrom<Value> for Document {
    type Error = TypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl From<&Document> for Value {
    fn from(document: &Document) -> Self {
        document.to_json()
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, Document>> for Document {
    fn from(value: BTreeMap<String, Document>) -> Self {
        Self::Map(value)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
