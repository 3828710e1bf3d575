//! Schedule-based delivery provider

use std::sync::Arc;

use async_trait::async_trait;
use harvest_domain::{Delivery, Result};

use super::pause::{PauseController, PauseOutcome, PausePolicy};
use super::ports::{DeliveryProvider, DeliverySource};
use super::resolver::NextDeliveryResolver;
use super::session::SessionSource;
use crate::clock::Clock;

/// [`DeliveryProvider`] over any schedule-feed [`DeliverySource`].
///
/// Wraps the source in a [`SessionSource`] so resolver and pause
/// controller share one lazily established session.
pub struct ScheduleProvider {
    source: Arc<dyn DeliverySource>,
    resolver: NextDeliveryResolver,
    controller: PauseController,
    clock: Arc<dyn Clock>,
}

impl ScheduleProvider {
    pub fn new(source: Arc<dyn DeliverySource>, policy: PausePolicy, clock: Arc<dyn Clock>) -> Self {
        let session: Arc<dyn DeliverySource> = Arc::new(SessionSource::new(source));
        Self {
            resolver: NextDeliveryResolver::new(Arc::clone(&session)),
            controller: PauseController::new(Arc::clone(&session), policy),
            source: session,
            clock,
        }
    }
}

#[async_trait]
impl DeliveryProvider for ScheduleProvider {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn supports_pause(&self) -> bool {
        self.source.supports_pause()
    }

    async fn authenticate(&self) -> Result<()> {
        self.source.authenticate().await
    }

    async fn resolve_next(&self) -> Result<Delivery> {
        self.resolver.resolve(self.clock.today()).await
    }

    async fn pause_next(&self) -> PauseOutcome {
        self.controller.pause(self.clock.today()).await
    }

    async fn unpause_next(&self) -> PauseOutcome {
        self.controller.unpause(self.clock.today()).await
    }

    async fn close(&self) -> Result<()> {
        self.source.close().await
    }
}
