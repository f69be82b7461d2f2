//! Search backend trait definition.
//!
//! This module defines the abstract interface for search backend operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use flight_search_shared::{PageQuery, SearchDocument, SearchPage};
use serde_json::{Map, Value};

use crate::errors::SearchBackendError;

/// Abstracts the underlying search backend (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `FlightSearchService` and the pagination
/// cursor, which lets the paging logic run against a mock backend in tests and
/// keeps it free of any particular client library.
///
/// All methods return `Result<T, SearchBackendError>` for consistent error
/// handling across different backend implementations.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch one page of documents.
    ///
    /// # Arguments
    ///
    /// * `query` - The page request: index, filter, sort, size and resume key
    ///
    /// # Returns
    ///
    /// * `Ok(SearchPage)` - The documents in backend order, possibly empty
    /// * `Err(SearchBackendError::BackendUnavailable)` - If the backend cannot be reached
    /// * `Err(SearchBackendError::MalformedQuery)` - If the backend rejects the query
    async fn search(&self, query: &PageQuery) -> Result<SearchPage, SearchBackendError>;

    /// Fetch a single document by key.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<SearchDocument>, SearchBackendError>;

    /// Store a document, replacing any document with the same key.
    ///
    /// When `id` is `None` a key is generated.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The key the document was stored under
    /// * `Err(SearchBackendError)` - If indexing fails
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Map<String, Value>,
    ) -> Result<String, SearchBackendError>;

    /// Delete a document by key.
    ///
    /// If the document doesn't exist, the operation is considered successful.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The document was deleted
    /// * `Ok(false)` - There was no such document
    /// * `Err(SearchBackendError)` - If the deletion fails
    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchBackendError>;

    /// Check that `index` exists and the backend is reachable.
    ///
    /// Called during application startup before serving requests.
    async fn check_index_exists(&self, index: &str) -> Result<(), SearchBackendError>;
}
