//! OpenSearch implementation of the search backend.
//!
//! This module provides a concrete implementation of `SearchBackend`
//! using OpenSearch (or any Elasticsearch-compatible cluster) as the backend.

mod provider;
mod response;

pub use provider::OpenSearchProvider;
pub use response::parse_search_response;
