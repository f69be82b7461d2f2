//! Document type returned by the search backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single document as stored in the search backend.
///
/// The `id` is the document's key: it is unique within an index and is
/// ordered byte-wise, which is the order the backend sorts on when paging.
/// The `source` holds the document attributes; their meaning is defined by
/// the index, not by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchDocument {
    /// The document key (`_id`).
    pub id: String,

    /// The stored attributes (`_source`).
    #[serde(default)]
    pub source: Map<String, Value>,

    /// Sort values echoed back by the backend for this hit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
}

impl SearchDocument {
    /// Create a document with the given key and attributes.
    pub fn new(id: impl Into<String>, source: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            source,
            sort: None,
        }
    }

    /// Create a document that carries only a key.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::new(id, Map::new())
    }

    /// Look up a single attribute.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.source.get(name)
    }
}
