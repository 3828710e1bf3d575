//! Next-delivery resolution

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use harvest_domain::{
    BasketItem, Delivery, OrderLineItem, OrderRecord, PauseRecord, Result, ScheduleEntry,
    UnitOverride,
};
use tracing::{debug, info, instrument, warn};

use super::classifier::next_candidate;
use super::pauses::{is_paused, pause_records};
use super::ports::DeliverySource;

/// Target slot of a resolution together with the pause records seen in the
/// same feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub target: Option<ScheduleEntry>,
    pub pauses: Vec<PauseRecord>,
    pub is_paused: bool,
}

/// Picks the next delivery from a [`DeliverySource`] and loads its basket.
pub struct NextDeliveryResolver {
    source: Arc<dyn DeliverySource>,
}

impl NextDeliveryResolver {
    pub fn new(source: Arc<dyn DeliverySource>) -> Self {
        Self { source }
    }

    /// Fetch the feed once and locate the target slot and its pause state.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn locate(&self, today: NaiveDate) -> Result<Resolution> {
        let feed = self.source.list_schedule().await?;
        let pauses = pause_records(&feed);
        let target = next_candidate(&feed, today);
        let paused = target.as_ref().is_some_and(|entry| is_paused(entry, &pauses));

        debug!(
            records = feed.len(),
            pauses = pauses.len(),
            target_date = ?target.as_ref().map(|entry| entry.delivery_date),
            paused,
            "Located next delivery slot"
        );

        Ok(Resolution { target, pauses, is_paused: paused })
    }

    /// Resolve the next delivery including its basket.
    ///
    /// Item fetch failures other than authentication leave the delivery
    /// without items instead of failing the whole resolution.
    pub async fn resolve(&self, today: NaiveDate) -> Result<Delivery> {
        let resolution = self.locate(today).await?;
        let supports_pause = self.source.supports_pause();

        let Some(target) = resolution.target else {
            info!(source = self.source.name(), "No upcoming delivery scheduled");
            return Ok(Delivery::empty(supports_pause));
        };

        let items = if target.order_id > 0 {
            self.fetch_items(target.order_id).await?
        } else {
            Vec::new()
        };

        info!(
            source = self.source.name(),
            date = %target.delivery_date,
            order_id = target.order_id,
            items = items.len(),
            paused = resolution.is_paused,
            "Resolved next delivery"
        );

        Ok(Delivery {
            delivery_date: Some(target.delivery_date),
            items,
            is_paused: resolution.is_paused,
            supports_pause,
            last_order_change: target.last_order_change,
        })
    }

    async fn fetch_items(&self, order_id: i64) -> Result<Vec<BasketItem>> {
        match self.source.list_order_items(order_id).await {
            Ok(records) => Ok(basket_items(records)),
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                warn!(
                    order_id,
                    error = %err,
                    kind = err.label(),
                    "Failed to fetch order items, reporting delivery without items"
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Build basket items in fetch order, applying unit overrides by item id.
pub fn basket_items(records: Vec<OrderRecord>) -> Vec<BasketItem> {
    let mut items: Vec<OrderLineItem> = Vec::new();
    let mut overrides: HashMap<i64, UnitOverride> = HashMap::new();

    for record in records {
        match record {
            OrderRecord::Item(item) => items.push(item),
            OrderRecord::Override(unit_override) => {
                overrides.insert(unit_override.item_id, unit_override);
            }
        }
    }

    items
        .into_iter()
        .map(|item| {
            let (unit, quantity) = match item.item_id.and_then(|id| overrides.get(&id)) {
                Some(unit_override) => (unit_override.unit_name.clone(), unit_override.quantity()),
                None => (item.unit.clone(), item.effective_quantity()),
            };
            BasketItem {
                product_id: item.item_id.map(|id| id.to_string()),
                name: item.name,
                quantity,
                unit,
            }
        })
        .collect()
}
