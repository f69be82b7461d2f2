//! Core data structures used across the flight search workspace.

pub mod search_document;
pub mod search_query;
pub mod search_result;

pub use search_document::SearchDocument;
pub use search_query::{PageQuery, SortField, SortOrder};
pub use search_result::SearchPage;
