//! # Flight Search Shared
//!
//! This crate defines the data structures shared across the flight search
//! workspace: the documents a search backend returns, the pages they arrive
//! in, and the query specification used to request those pages.

pub mod types;

pub use types::search_document::SearchDocument;
pub use types::search_query::{PageQuery, SortField, SortOrder, KEY_FIELD};
pub use types::search_result::SearchPage;
