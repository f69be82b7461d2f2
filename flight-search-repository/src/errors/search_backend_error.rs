//! Search backend error types.
//!
//! This module defines the unified error type for all search backend operations,
//! covering transport failures, rejected queries and input validation.

use thiserror::Error;

/// Unified errors from search backend operations.
///
/// Used by the `SearchBackend` trait, the pagination cursor and
/// `FlightSearchService`. A stalled pagination run is not an error; it is
/// reported through `Termination::StalledCursor` on a successful result.
#[derive(Debug, Clone, Error)]
pub enum SearchBackendError {
    /// Input rejected before any backend call was made.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The backend could not be reached.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend rejected the query (e.g. an invalid sort field).
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Failed to build the backend client.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Failed to parse a response from the backend.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchBackendError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a backend unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create a malformed query error.
    pub fn malformed_query(msg: impl Into<String>) -> Self {
        Self::MalformedQuery(msg.into())
    }

    /// Create a request failed error.
    pub fn request_failed(status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index not found error.
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound(index.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    ///
    /// 400 means the backend refused the query itself; anything else is
    /// reported with its status and body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => Self::malformed_query(body),
            _ => Self::request_failed(status, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_bad_request_is_malformed_query() {
        let err = SearchBackendError::from_status(400, "No mapping found for [bogus]");
        assert!(matches!(err, SearchBackendError::MalformedQuery(_)));
        assert_eq!(
            err.to_string(),
            "Malformed query: No mapping found for [bogus]"
        );
    }

    #[test]
    fn test_from_status_other_is_request_failed() {
        let err = SearchBackendError::from_status(503, "unavailable");
        assert!(matches!(
            err,
            SearchBackendError::RequestFailed { status: 503, .. }
        ));
    }
}
