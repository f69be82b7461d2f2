//! Search result types for the flight search service.

use serde::{Deserialize, Serialize};

use crate::types::search_document::SearchDocument;

/// One bounded page of documents returned by a single backend query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchPage {
    /// The documents, in the order the backend returned them.
    pub documents: Vec<SearchDocument>,

    /// Total number of matching documents, when the backend reports it.
    /// May be greater than the number of returned documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hint: Option<u64>,
}

impl SearchPage {
    /// Create an empty page.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a page from documents.
    pub fn new(documents: Vec<SearchDocument>, total_hint: Option<u64>) -> Self {
        Self {
            documents,
            total_hint,
        }
    }

    /// Number of documents on this page.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the page has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over the document keys on this page.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.id.as_str())
    }

    /// The last document on the page, if any.
    pub fn last(&self) -> Option<&SearchDocument> {
        self.documents.last()
    }
}
