//! Flight search service implementation.
//!
//! This module provides the main service for interacting with the search
//! backend. Application code uses it to read, write and delete documents in
//! the flight index, to look a flight up by its nose number, and to collect
//! every matching document key through search-after pagination.

use std::sync::Arc;

use flight_search_shared::{PageQuery, SearchDocument, SearchPage};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::{FlightIndexConfig, SearchServiceConfig, MAX_PAGE_SIZE};
use crate::errors::SearchBackendError;
use crate::interfaces::SearchBackend;
use crate::pagination::PaginationCursor;
use crate::types::CollectedKeys;
use crate::utils::require_non_empty;

/// The main service for interacting with the flight index.
///
/// This is the high-level API that application code should use. It validates
/// input, builds backend queries and delegates to a `SearchBackend` for the
/// actual requests. The backend is injected, so one provider can be shared
/// by several services and replaced by a mock in tests.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use flight_search_repository::{FlightIndexConfig, FlightSearchService, OpenSearchProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenSearchProvider::new("https://localhost:443")?);
/// let service = FlightSearchService::new(provider, FlightIndexConfig::new("flights", "noseNumber"));
///
/// let flights = service.find_flight_by_nose_number("N12345").await?;
/// let all_ids = service.collect_ids(None, None).await?;
/// # Ok(())
/// # }
/// ```
pub struct FlightSearchService {
    backend: Arc<dyn SearchBackend>,
    index: FlightIndexConfig,
    config: SearchServiceConfig,
}

impl FlightSearchService {
    /// Create a new FlightSearchService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `backend` - A shared `SearchBackend` implementation (e.g., `OpenSearchProvider`)
    /// * `index` - Which index holds flights and how the nose number is matched
    pub fn new(backend: Arc<dyn SearchBackend>, index: FlightIndexConfig) -> Self {
        Self::with_config(backend, index, SearchServiceConfig::default())
    }

    /// Create a new FlightSearchService with custom configuration.
    pub fn with_config(
        backend: Arc<dyn SearchBackend>,
        index: FlightIndexConfig,
        config: SearchServiceConfig,
    ) -> Self {
        Self {
            backend,
            index,
            config,
        }
    }

    /// The flight index name.
    pub fn index_name(&self) -> &str {
        &self.index.index
    }

    /// Verify the flight index exists.
    pub async fn check_ready(&self) -> Result<(), SearchBackendError> {
        require_non_empty("index", &self.index.index)?;
        self.backend.check_index_exists(&self.index.index).await
    }

    /// Fetch a document from the flight index by key.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SearchDocument))` - The document
    /// * `Ok(None)` - If no document has this key
    /// * `Err(SearchBackendError::ValidationError)` - If `id` is blank
    pub async fn get(&self, id: &str) -> Result<Option<SearchDocument>, SearchBackendError> {
        let id = require_non_empty("id", id)?;
        self.backend.get_document(&self.index.index, id).await
    }

    /// Run a single search request and return the page as-is.
    ///
    /// The query's size is capped at `MAX_PAGE_SIZE`. No cursor is
    /// followed; use `collect_ids` to walk the full result set.
    pub async fn search(&self, query: PageQuery) -> Result<SearchPage, SearchBackendError> {
        require_non_empty("index", &query.index)?;
        let size = query.size.min(MAX_PAGE_SIZE);
        self.backend.search(&query.with_size(size)).await
    }

    /// Store a document in the flight index.
    ///
    /// # Arguments
    ///
    /// * `id` - The key to store under; a key is generated when `None`
    /// * `source` - The document attributes
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The key the document was stored under
    /// * `Err(SearchBackendError::ValidationError)` - If `id` is blank
    pub async fn index(
        &self,
        id: Option<&str>,
        source: Map<String, Value>,
    ) -> Result<String, SearchBackendError> {
        let id = id.map(|id| require_non_empty("id", id)).transpose()?;
        let stored = self
            .backend
            .index_document(&self.index.index, id, &source)
            .await?;
        info!(index = %self.index.index, id = %stored, "Document stored");
        Ok(stored)
    }

    /// Delete a document from the flight index.
    ///
    /// Returns `Ok(false)` when there was no such document.
    pub async fn delete(&self, id: &str) -> Result<bool, SearchBackendError> {
        let id = require_non_empty("id", id)?;
        let deleted = self.backend.delete_document(&self.index.index, id).await?;
        info!(index = %self.index.index, id = %id, deleted, "Delete processed");
        Ok(deleted)
    }

    /// Look up a flight by nose number.
    ///
    /// Runs a single `match` query on the configured field, limited to one
    /// hit, and returns the attributes of the match (restricted to
    /// `fetch_source` when configured). The result is empty when nothing
    /// matches.
    pub async fn find_flight_by_nose_number(
        &self,
        nose_number: &str,
    ) -> Result<Vec<Map<String, Value>>, SearchBackendError> {
        let nose_number = require_non_empty("nose_number", nose_number)?;

        let mut query = PageQuery::new(&self.index.index, 1).with_filter(json!({
            "match": { self.index.query_field.as_str(): nose_number }
        }));
        if let Some(ref fields) = self.index.fetch_source {
            query = query.with_source_fields(fields.clone());
        }

        let page = self.backend.search(&query).await?;
        debug!(
            nose_number = %nose_number,
            matches = page.len(),
            "Flight lookup finished"
        );

        Ok(page.documents.into_iter().map(|doc| doc.source).collect())
    }

    /// Collect the key of every document in the flight index matching `filter`.
    ///
    /// # Arguments
    ///
    /// * `filter` - Backend query predicate; `None` matches everything
    /// * `page_size` - Documents per request; defaults to the configured page size
    ///
    /// # Returns
    ///
    /// * `Ok(CollectedKeys)` - The keys, the number of fetches and why the run stopped
    /// * `Err(SearchBackendError::ValidationError)` - If the page size is zero
    /// * `Err(SearchBackendError)` - If any fetch fails
    pub async fn collect_ids(
        &self,
        filter: Option<Value>,
        page_size: Option<usize>,
    ) -> Result<CollectedKeys, SearchBackendError> {
        let mut template =
            PageQuery::new(&self.index.index, page_size.unwrap_or(self.config.page_size));
        template.filter = filter;

        let collected = PaginationCursor::new(self.backend.as_ref(), template)?
            .collect_all_keys()
            .await?;

        info!(
            index = %self.index.index,
            ids = collected.len(),
            fetches = collected.fetches,
            termination = ?collected.termination,
            "Collected document ids"
        );
        Ok(collected)
    }
}
