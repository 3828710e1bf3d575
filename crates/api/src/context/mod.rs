//! Application context - dependency injection container

use std::sync::Arc;

use harvest_core::{Clock, ReconciliationService, SystemClock};
use harvest_domain::{AppConfig, Result};
use tracing::info;

/// Application context - holds the configured services
pub struct AppContext {
    pub config: AppConfig,
    pub service: Arc<ReconciliationService>,
}

impl AppContext {
    /// Wire adapters for `config` against the local wall clock.
    ///
    /// # Errors
    /// Returns configuration errors before any network call is made.
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`Self::new`] with an injected clock.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let service = harvest_infra::build_service(&config, clock)?;
        info!(provider = %config.provider.kind, "Application context initialised");
        Ok(Self { config, service: Arc::new(service) })
    }

    /// Release the upstream session.
    pub async fn shutdown(&self) -> Result<()> {
        self.service.provider().close().await
    }
}
