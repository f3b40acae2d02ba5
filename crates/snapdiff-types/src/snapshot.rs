use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::TypeError;

/// One observation of a remote document.
///
/// The `id` is the stable entity id and `last_edited_time` the ISO-8601
/// timestamp the remote source reported for this version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub last_edited_time: String,
    #[serde(rename = "snapshot")]
    pub document: Document,
}

impl Snapshot {
    pub fn new(
        id: impl Into<String>,
        last_edited_time: impl Into<String>,
        document: Document,
    ) -> Self {
        Self {
            id: id.into(),
            last_edited_time: last_edited_time.into(),
            document,
        }
    }

    /// Build a snapshot from a document that carries its own top-level `id`
    /// and `last_edited_time` string fields, as the remote source returns them.
    pub fn from_document(document: Document) -> Result<Self, TypeError> {
        let id = string_field(&document, "id")?;
        let last_edited_time = string_field(&document, "last_edited_time")?;
        Ok(Self {
            id,
            last_edited_time,
            document,
        })
    }
}

fn string_field(document: &Document, name: &str) -> Result<String, TypeError> {
    document
        .get(name)
        .and_then(Document::as_str)
        .map(str::to_string)
        .ok_or_else(|| TypeError::MissingField(name.to_string()))
}
