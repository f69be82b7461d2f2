//! Configuration types for the FlightSearchService.

/// Largest page a single search request may ask for.
///
/// Elasticsearch and OpenSearch reject `from + size` beyond
/// `index.max_result_window`, which defaults to 10,000.
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Configuration for the FlightSearchService.
#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    /// Page size used by key collection when the caller doesn't pick one.
    ///
    /// Values above `MAX_PAGE_SIZE` are capped when a run starts.
    /// Defaults to `MAX_PAGE_SIZE`.
    pub page_size: usize,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl SearchServiceConfig {
    /// Create a config with a custom default page size.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Documents requested per page during key collection
    pub fn with_page_size(page_size: usize) -> Self {
        Self { page_size }
    }
}

/// Where flight records live and how the nose number lookup reads them.
#[derive(Debug, Clone)]
pub struct FlightIndexConfig {
    /// The index holding flight documents.
    pub index: String,
    /// The field matched against a nose number.
    pub query_field: String,
    /// Restrict returned attributes to these fields. `None` returns all.
    pub fetch_source: Option<Vec<String>>,
}

impl FlightIndexConfig {
    /// Create a flight index configuration that returns every attribute.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `query_field` - The field holding the nose number
    pub fn new(index: impl Into<String>, query_field: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            query_field: query_field.into(),
            fetch_source: None,
        }
    }

    /// Restrict the lookup's `_source` to the given fields.
    ///
    /// An empty list leaves the restriction off.
    pub fn with_fetch_source(mut self, fields: Vec<String>) -> Self {
        self.fetch_source = if fields.is_empty() { None } else { Some(fields) };
        self
    }
}
