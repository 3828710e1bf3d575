//! Port interfaces for delivery data sources
//!
//! These traits define the boundaries between core business logic
//! and the upstream subscription systems.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use harvest_domain::{Delivery, FeedRecord, OrderRecord, Result};

use super::pause::PauseOutcome;

/// Raw capability surface of an upstream subscription backend.
///
/// Implementations translate wire payloads into domain records and map
/// upstream failures onto [`harvest_domain::HarvestError`] kinds. Session
/// handling lives in [`super::SessionSource`], not in the adapters.
#[async_trait]
pub trait DeliverySource: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Whether the backend accepts pause windows at all
    fn supports_pause(&self) -> bool;

    /// Establish (or re-establish) an upstream session
    async fn authenticate(&self) -> Result<()>;

    /// Fetch the heterogeneous schedule feed: slots, pause records and noise
    async fn list_schedule(&self) -> Result<Vec<FeedRecord>>;

    /// Fetch line items and unit overrides of one order, in upstream order
    async fn list_order_items(&self, order_id: i64) -> Result<Vec<OrderRecord>>;

    /// Request a pause window.
    ///
    /// A collision with an already planned delivery must surface as
    /// [`harvest_domain::HarvestError::Conflict`].
    async fn create_pause(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        auto_cancel: bool,
    ) -> Result<()>;

    /// Remove a pause record by its upstream identifier
    async fn remove_pause(&self, pause_id: &str) -> Result<()>;

    /// Release the upstream session
    async fn close(&self) -> Result<()>;
}

/// High-level view of a subscription used by the orchestrator and the CLI.
#[async_trait]
pub trait DeliveryProvider: Send + Sync {
    fn name(&self) -> &str;

    fn supports_pause(&self) -> bool;

    async fn authenticate(&self) -> Result<()>;

    /// Resolve the next actionable delivery
    async fn resolve_next(&self) -> Result<Delivery>;

    /// Pause the week of the next delivery
    async fn pause_next(&self) -> PauseOutcome;

    /// Remove the pause covering the next delivery
    async fn unpause_next(&self) -> PauseOutcome;

    /// Authenticate and resolve once; true when both succeed
    async fn test_connection(&self) -> bool {
        if let Err(err) = self.authenticate().await {
            tracing::warn!(provider = self.name(), error = %err, "Connection test failed to authenticate");
            return false;
        }
        match self.resolve_next().await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(provider = self.name(), error = %err, "Connection test failed to resolve");
                false
            }
        }
    }

    async fn close(&self) -> Result<()>;
}
