//! External service integrations
//!
//! - [`oekobox`]: schedule-feed shops with pause support
//! - [`amperhof`]: basket-only provider
//! - [`shopping_list`]: the household list file
//!
//! [`build_service`] wires the configured adapters into the core
//! reconciliation service.

pub mod amperhof;
pub mod oekobox;
pub mod shopping_list;

mod dates;

use std::sync::Arc;

use harvest_core::{
    Clock, DeliveryProvider, PausePolicy, ReconciliationService, ScheduleProvider,
    ShoppingListMatcher,
};
use harvest_domain::{AppConfig, HarvestError, ProviderKind, Result};
use tracing::info;

pub use amperhof::{AmperhofProvider, DEFAULT_AMPERHOF_BASE_URL};
pub use oekobox::{OekoboxSource, DEFAULT_OEKOBOX_BASE_URL};
pub use shopping_list::FileShoppingList;

use crate::http::HttpClient;

/// Build the delivery provider selected by `config.provider.kind`.
///
/// # Errors
/// Returns `HarvestError::Config` for incomplete provider settings or an
/// error from constructing the HTTP client.
pub fn build_provider(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Arc<dyn DeliveryProvider>> {
    let http = HttpClient::new()?;
    let provider: Arc<dyn DeliveryProvider> = match config.provider.kind {
        ProviderKind::Oekobox => {
            let source = OekoboxSource::from_config(&config.provider, http)?;
            Arc::new(ScheduleProvider::new(
                Arc::new(source),
                PausePolicy::from(&config.pause),
                clock,
            ))
        }
        ProviderKind::Amperhof => {
            Arc::new(AmperhofProvider::from_config(&config.provider, http, clock))
        }
    };
    info!(provider = provider.name(), supports_pause = provider.supports_pause(), "Delivery provider ready");
    Ok(provider)
}

/// Build the reconciliation service, with list matching when enabled.
///
/// # Errors
/// Propagates [`build_provider`] errors; enabled matching without a list
/// path is a configuration error.
pub fn build_service(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<ReconciliationService> {
    let service = ReconciliationService::new(build_provider(config, clock)?);
    if !config.shopping_list.enabled {
        return Ok(service);
    }

    let path = config.shopping_list.path.clone().ok_or_else(|| {
        HarvestError::Config("shopping_list.path is required when matching is enabled".into())
    })?;
    info!(path = %path.display(), threshold = config.shopping_list.threshold(), "Shopping list matching enabled");
    let list = Arc::new(FileShoppingList::new(path));
    Ok(service.with_matcher(ShoppingListMatcher::from_config(list, &config.shopping_list)))
}
