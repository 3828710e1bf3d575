//! Reconciliation service - one refresh cycle end to end

use std::sync::Arc;

use harvest_domain::{Delivery, HarvestError, MatchResult};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::delivery::ports::DeliveryProvider;
use crate::delivery::PauseOutcome;
use crate::shopping::ShoppingListMatcher;

/// Result of one refresh cycle.
///
/// On failure `delivery` and `matches` hold the last known good values and
/// `error` carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshOutcome {
    pub delivery: Option<Delivery>,
    pub matches: MatchResult,
    pub error: Option<HarvestError>,
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Default)]
struct CycleState {
    delivery: Option<Delivery>,
    matches: MatchResult,
}

/// Drives resolve, match and mark-delivered for one provider.
///
/// Cycles and pause requests share one lock so at most one of them talks to
/// the provider at a time.
pub struct ReconciliationService {
    provider: Arc<dyn DeliveryProvider>,
    matcher: Option<ShoppingListMatcher>,
    state: Mutex<CycleState>,
}

impl ReconciliationService {
    pub fn new(provider: Arc<dyn DeliveryProvider>) -> Self {
        Self { provider, matcher: None, state: Mutex::new(CycleState::default()) }
    }

    /// Enable shopping-list reconciliation
    pub fn with_matcher(mut self, matcher: ShoppingListMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn provider(&self) -> &Arc<dyn DeliveryProvider> {
        &self.provider
    }

    /// Last successfully resolved delivery, if any
    pub async fn last_delivery(&self) -> Option<Delivery> {
        self.state.lock().await.delivery.clone()
    }

    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let mut state = self.state.lock().await;
        self.run_cycle(&mut state).await
    }

    /// Pause the next delivery week, then refresh.
    pub async fn pause(&self) -> bool {
        self.change_pause_state(true).await.is_applied()
    }

    /// Remove the pause on the next delivery, then refresh.
    pub async fn unpause(&self) -> bool {
        self.change_pause_state(false).await.is_applied()
    }

    /// Like [`Self::pause`] / [`Self::unpause`] but returns the detailed outcome.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn change_pause_state(&self, pause: bool) -> PauseOutcome {
        let mut state = self.state.lock().await;
        if !self.provider.supports_pause() {
            warn!("Provider does not support pausing");
            return PauseOutcome::Unsupported;
        }

        let outcome = if pause {
            self.provider.pause_next().await
        } else {
            self.provider.unpause_next().await
        };

        if outcome.is_applied() {
            let refreshed = self.run_cycle(&mut state).await;
            if let Some(err) = refreshed.error {
                warn!(error = %err, "Refresh after pause change failed");
            }
        }
        outcome
    }

    async fn run_cycle(&self, state: &mut CycleState) -> RefreshOutcome {
        let delivery = match self.provider.resolve_next().await {
            Ok(delivery) => delivery,
            Err(err) => {
                error!(error = %err, kind = err.label(), "Delivery update failed");
                return RefreshOutcome {
                    delivery: state.delivery.clone(),
                    matches: state.matches.clone(),
                    error: Some(err),
                };
            }
        };

        let matches = match &self.matcher {
            Some(matcher) => {
                let matches = match matcher.match_items(&delivery.items).await {
                    Ok(matches) => matches,
                    Err(err) => {
                        warn!(error = %err, "Shopping list matching failed, continuing without matches");
                        MatchResult::new()
                    }
                };
                if !matches.is_empty() {
                    matcher.mark_delivered(&matches, delivery.delivery_date).await;
                }
                matches
            }
            None => MatchResult::new(),
        };

        info!(
            date = ?delivery.delivery_date,
            items = delivery.total_items(),
            paused = delivery.is_paused,
            matches = matches.len(),
            "Refresh cycle complete"
        );

        state.delivery = Some(delivery.clone());
        state.matches = matches.clone();
        RefreshOutcome { delivery: Some(delivery), matches, error: None }
    }
}
