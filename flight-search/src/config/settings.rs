//! Environment-driven settings for the flight search service.

use std::env;
use std::time::Duration;

use flight_search_repository::utils::parse_field_list;
use tracing::warn;

use crate::AppError;

/// Default search host.
const DEFAULT_HOST: &str = "localhost";

/// Default URL scheme.
const DEFAULT_SCHEMA: &str = "https";

/// Default search port.
const DEFAULT_PORT: u16 = 443;

/// Default flight index.
const DEFAULT_INDEX: &str = "flights";

/// Default field matched by the nose number lookup.
const DEFAULT_QUERY_FIELD: &str = "noseNumber";

/// Default pagination page size.
const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if the backend is unreachable.
    FailFast,
    /// Retry at a fixed interval until the backend answers.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid ELASTIC_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub schema: String,
    pub port: u16,
    pub index: String,
    pub query_field: String,
    pub fetch_source: Vec<String>,
    pub page_size: usize,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTIC_HOST_URL`: Search host name (default: localhost)
    /// - `ELASTIC_SCHEMA`: URL scheme (default: https)
    /// - `ELASTIC_PORT`: Search port (default: 443)
    /// - `ELASTIC_DOCUMENT_INDEX`: Flight index (default: flights)
    /// - `ELASTIC_QUERY_FIELD`: Field matched by nose number lookups (default: noseNumber)
    /// - `ELASTIC_FETCH_SOURCE`: Comma-separated fields returned by lookups (default: all)
    /// - `ELASTIC_PAGE_SIZE`: Page size for id collection (default: 10000)
    /// - `ELASTIC_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `ELASTIC_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("ELASTIC_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid ELASTIC_PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let page_size = match lookup("ELASTIC_PAGE_SIZE") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::config(format!("Invalid ELASTIC_PAGE_SIZE '{}': {}", raw, e))
            })?,
            None => DEFAULT_PAGE_SIZE,
        };
        if page_size == 0 {
            return Err(AppError::config("ELASTIC_PAGE_SIZE must be greater than zero"));
        }

        let retry_interval = match lookup("ELASTIC_RETRY_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::config(format!(
                    "Invalid ELASTIC_RETRY_INTERVAL_SECS '{}': {}",
                    raw, e
                ))
            })?,
            None => DEFAULT_RETRY_INTERVAL_SECS,
        };

        Ok(Self {
            host: lookup("ELASTIC_HOST_URL").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            schema: lookup("ELASTIC_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            port,
            index: lookup("ELASTIC_DOCUMENT_INDEX").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            query_field: lookup("ELASTIC_QUERY_FIELD")
                .unwrap_or_else(|| DEFAULT_QUERY_FIELD.to_string()),
            fetch_source: lookup("ELASTIC_FETCH_SOURCE")
                .map(|s| parse_field_list(&s))
                .unwrap_or_default(),
            page_size,
            connection_mode: ConnectionMode::parse(lookup("ELASTIC_CONNECTION_MODE").as_deref()),
            retry_interval: Duration::from_secs(retry_interval),
        })
    }

    /// The backend URL, e.g. `https://localhost:443`.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.schema, self.host, self.port)
    }
}
