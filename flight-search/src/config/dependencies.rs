//! Dependency initialization and wiring for the flight search service.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::settings::{ConnectionMode, Settings};
use crate::AppError;
use flight_search_repository::{
    FlightIndexConfig, FlightSearchService, OpenSearchProvider, SearchBackend,
    SearchBackendError, SearchServiceConfig,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The flight search service, connected and ready.
    pub service: FlightSearchService,
}

impl Dependencies {
    /// Build the OpenSearch provider from settings and wait for the flight
    /// index to become available.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the provider cannot be built, or the index is
    ///   unavailable in fail-fast mode
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        let url = settings.url();

        info!(
            url = %url,
            index = %settings.index,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(&url).map_err(|e| {
            AppError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        let deps = Self::from_backend(Arc::new(provider), settings);

        Self::wait_until_ready(
            &deps.service,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("Search backend connection established");
        Ok(deps)
    }

    /// Wire the service around an already-built backend.
    pub fn from_backend(backend: Arc<dyn SearchBackend>, settings: &Settings) -> Self {
        let index = FlightIndexConfig::new(&settings.index, &settings.query_field)
            .with_fetch_source(settings.fetch_source.clone());
        let config = SearchServiceConfig::with_page_size(settings.page_size);

        Self {
            service: FlightSearchService::with_config(backend, index, config),
        }
    }

    /// Check the flight index, retrying transient failures according to `mode`.
    ///
    /// Only transport failures, 5xx and 429 responses are retried. A missing
    /// index, a rejected request or an auth failure fails immediately in
    /// either mode.
    pub async fn wait_until_ready(
        service: &FlightSearchService,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<(), AppError> {
        loop {
            match service.check_ready().await {
                Ok(()) => return Ok(()),
                Err(e) if mode == ConnectionMode::Retry && Self::is_transient(&e) => {
                    warn!(
                        index = %service.index_name(),
                        error = %e,
                        retry_interval_secs = retry_interval.as_secs(),
                        "Search backend not ready, retrying..."
                    );
                    sleep(retry_interval).await;
                }
                Err(e) => {
                    return Err(AppError::config(format!(
                        "Search backend not ready: {}",
                        e
                    )));
                }
            }
        }
    }

    fn is_transient(error: &SearchBackendError) -> bool {
        match error {
            SearchBackendError::BackendUnavailable(_) => true,
            SearchBackendError::RequestFailed { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
