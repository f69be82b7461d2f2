//! # Flight Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search backend. It includes definitions for errors, the backend interface,
//! a concrete implementation for OpenSearch, search-after pagination and the
//! flight search service built on top of them.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod pagination;
pub mod service;
pub mod types;
pub mod utils;

pub use config::{FlightIndexConfig, SearchServiceConfig, MAX_PAGE_SIZE};
pub use errors::SearchBackendError;
pub use interfaces::SearchBackend;
pub use opensearch::OpenSearchProvider;
pub use pagination::PaginationCursor;
pub use service::FlightSearchService;
pub use types::{CollectedKeys, Termination};
