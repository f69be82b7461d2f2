//! Search query types for the flight search service.
//!
//! `PageQuery` is the backend-agnostic request for one bounded page of
//! documents. Backends translate it into their own request format; the
//! JSON produced by [`PageQuery::to_body`] follows the Elasticsearch /
//! OpenSearch search body layout.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Field holding the document key. Pages are sorted on it when paging.
pub const KEY_FIELD: &str = "_id";

/// Sort direction for a single sort field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One `(field, direction)` entry of a query's sort clause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortField {
    /// Create a sort entry.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Ascending sort on the document key.
    pub fn key_ascending() -> Self {
        Self::new(KEY_FIELD, SortOrder::Asc)
    }
}

/// Request for one page of documents.
///
/// This struct carries everything a backend needs to serve a single page:
/// the index, an opaque filter predicate, the sort clause, the page size and
/// an optional resume key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageQuery {
    /// The index to search.
    pub index: String,

    /// Backend query predicate. `None` matches every document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    /// Sort clause, applied in order.
    #[serde(default)]
    pub sort: Vec<SortField>,

    /// Maximum number of documents to return.
    pub size: usize,

    /// Resume strictly after this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_after: Option<String>,

    /// Restrict the returned attributes to these fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fields: Option<Vec<String>>,
}

impl PageQuery {
    /// Create an unsorted, unfiltered query against `index`.
    ///
    /// # Example
    ///
    /// ```
    /// use flight_search_shared::PageQuery;
    ///
    /// let query = PageQuery::new("flights", 10).sorted_by_key();
    /// assert_eq!(query.size, 10);
    /// ```
    pub fn new(index: impl Into<String>, size: usize) -> Self {
        Self {
            index: index.into(),
            filter: None,
            sort: Vec::new(),
            size,
            search_after: None,
            source_fields: None,
        }
    }

    /// Set the filter predicate.
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the page size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Append a sort entry.
    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push(SortField::new(field, order));
        self
    }

    /// Replace the sort clause with an ascending sort on the key.
    pub fn sorted_by_key(mut self) -> Self {
        self.sort = vec![SortField::key_ascending()];
        self
    }

    /// Restrict `_source` to the given fields.
    pub fn with_source_fields(mut self, fields: Vec<String>) -> Self {
        self.source_fields = Some(fields);
        self
    }

    /// Resume strictly after `key`.
    pub fn after(mut self, key: impl Into<String>) -> Self {
        self.search_after = Some(key.into());
        self
    }

    /// Whether the sort clause is exactly an ascending sort on the key.
    pub fn is_sorted_by_key(&self) -> bool {
        self.sort.len() == 1 && self.sort[0] == SortField::key_ascending()
    }

    /// Render the query as a search request body.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("size".to_string(), json!(self.size));
        body.insert(
            "query".to_string(),
            self.filter
                .clone()
                .unwrap_or_else(|| json!({ "match_all": {} })),
        );

        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|s| json!({ s.field.as_str(): { "order": s.order.as_str() } }))
                .collect();
            body.insert("sort".to_string(), Value::Array(sort));
        }

        if let Some(ref key) = self.search_after {
            body.insert("search_after".to_string(), json!([key]));
        }

        if let Some(ref fields) = self.source_fields {
            body.insert("_source".to_string(), json!(fields));
        }

        Value::Object(body)
    }
}
