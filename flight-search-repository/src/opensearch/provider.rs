//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust crate. The REST endpoints used here (`_search`,
//! `_doc`, index existence) are shared with Elasticsearch.

use async_trait::async_trait;
use flight_search_shared::{PageQuery, SearchDocument, SearchPage};
use opensearch::{
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::IndicesExistsParts,
    DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use url::Url;
use uuid::Uuid;

use crate::errors::SearchBackendError;
use crate::interfaces::SearchBackend;
use crate::opensearch::response::{parse_get_response, parse_search_response};

/// OpenSearch provider implementation.
///
/// Holds one client (and its connection pool) for the lifetime of the
/// provider. Build it once at startup and share it behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use flight_search_repository::OpenSearchProvider;
/// use flight_search_shared::PageQuery;
///
/// let provider = OpenSearchProvider::new("https://search.example.com:443")?;
/// let page = provider.search(&PageQuery::new("flights", 10).sorted_by_key()).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new provider for the cluster at `url`.
    ///
    /// No request is made here; use `check_index_exists` to verify the
    /// cluster is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The cluster URL (e.g., "https://localhost:443")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchBackendError::ConnectionError)` - If the URL or transport is invalid
    pub fn new(url: &str) -> Result<Self, SearchBackendError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchBackendError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchBackendError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Turn a non-success response into an error, logging the body.
    async fn failure(response: Response, operation: &str) -> SearchBackendError {
        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, operation, "Request failed");
        SearchBackendError::from_status(status.as_u16(), body)
    }
}

#[async_trait]
impl SearchBackend for OpenSearchProvider {
    async fn search(&self, query: &PageQuery) -> Result<SearchPage, SearchBackendError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&query.index]))
            .body(query.to_body())
            .send()
            .await
            .map_err(|e| SearchBackendError::unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, "search").await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchBackendError::parse(e.to_string()))?;
        let page = parse_search_response(&body)?;

        debug!(
            index = %query.index,
            size = query.size,
            search_after = ?query.search_after,
            returned = page.len(),
            "Search page fetched"
        );
        Ok(page)
    }

    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<SearchDocument>, SearchBackendError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchBackendError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            debug!(index = %index, id = %id, "Document not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::failure(response, "get").await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchBackendError::parse(e.to_string()))?;
        parse_get_response(&body)
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Map<String, Value>,
    ) -> Result<String, SearchBackendError> {
        let doc_id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let response = self
            .client
            .index(IndexParts::IndexId(index, &doc_id))
            .body(source)
            .send()
            .await
            .map_err(|e| SearchBackendError::unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, "index").await);
        }

        debug!(index = %index, doc_id = %doc_id, "Document indexed");
        Ok(doc_id)
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchBackendError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchBackendError::unavailable(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if status.as_u16() == 404 {
            debug!(index = %index, doc_id = %id, "Document to delete not found");
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Self::failure(response, "delete").await);
        }

        debug!(index = %index, doc_id = %id, "Document deleted");
        Ok(true)
    }

    async fn check_index_exists(&self, index: &str) -> Result<(), SearchBackendError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchBackendError::unavailable(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => {
                info!(index = %index, "Index is available");
                Ok(())
            }
            404 => Err(SearchBackendError::index_not_found(index)),
            _ => Err(Self::failure(response, "index exists").await),
        }
    }
}
