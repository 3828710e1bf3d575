//! Pause controller
//!
//! Suspends or resumes the week of the next delivery. The upstream only
//! accepts week-aligned windows, and a pause that collides with an already
//! planned order is answered with a scheduling conflict. Depending on
//! [`PausePolicy`] the controller retries such a conflict exactly once with
//! auto-cancel enabled.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use harvest_domain::{HarvestError, PauseConfig};
use tracing::{error, info, instrument, warn};

use super::pauses::removable_pause;
use super::ports::DeliverySource;
use super::resolver::NextDeliveryResolver;

/// How to react to a scheduling conflict on pause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PausePolicy {
    pub auto_cancel_on_conflict: bool,
}

impl From<&PauseConfig> for PausePolicy {
    fn from(config: &PauseConfig) -> Self {
        Self { auto_cancel_on_conflict: config.auto_cancel_on_conflict }
    }
}

/// Result of a pause or unpause request.
///
/// Only [`PauseOutcome::Paused`] and [`PauseOutcome::Resumed`] changed
/// anything upstream; every other variant maps to `false` for callers that
/// just need a yes/no answer.
#[derive(Debug, Clone, PartialEq)]
pub enum PauseOutcome {
    Paused { week_start: NaiveDate, auto_cancelled: bool },
    Resumed { pause_id: String },
    /// The source has no pause capability; nothing was sent upstream.
    Unsupported,
    NoPendingDelivery,
    AlreadyPaused,
    NotPaused,
    /// The delivery is paused but no removable record covers it.
    PauseRecordMissing,
    /// Conflict reported and auto-cancel is disabled.
    Conflict,
    Failed(HarvestError),
}

impl PauseOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Paused { .. } | Self::Resumed { .. })
    }
}

impl From<PauseOutcome> for bool {
    fn from(outcome: PauseOutcome) -> Self {
        outcome.is_applied()
    }
}

impl fmt::Display for PauseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paused { week_start, auto_cancelled: false } => {
                write!(f, "paused week starting {week_start}")
            }
            Self::Paused { week_start, auto_cancelled: true } => {
                write!(f, "paused week starting {week_start} (planned order cancelled)")
            }
            Self::Resumed { pause_id } => write!(f, "removed pause {pause_id}"),
            Self::Unsupported => f.write_str("provider does not support pausing"),
            Self::NoPendingDelivery => f.write_str("no pending delivery"),
            Self::AlreadyPaused => f.write_str("delivery is already paused"),
            Self::NotPaused => f.write_str("delivery is not paused"),
            Self::PauseRecordMissing => f.write_str("delivery is paused but no pause record was found"),
            Self::Conflict => f.write_str("scheduling conflict, auto-cancel disabled"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Monday 00:00 to Sunday 23:59:59.999 of the week containing `date`.
pub fn pause_week(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let start = monday.and_time(NaiveTime::MIN);
    let end = (monday + Duration::days(7)).and_time(NaiveTime::MIN) - Duration::milliseconds(1);
    (start, end)
}

pub struct PauseController {
    source: Arc<dyn DeliverySource>,
    resolver: NextDeliveryResolver,
    policy: PausePolicy,
}

impl PauseController {
    pub fn new(source: Arc<dyn DeliverySource>, policy: PausePolicy) -> Self {
        let resolver = NextDeliveryResolver::new(Arc::clone(&source));
        Self { source, resolver, policy }
    }

    pub fn policy(&self) -> PausePolicy {
        self.policy
    }

    /// Pause the week of the next delivery.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn pause(&self, today: NaiveDate) -> PauseOutcome {
        if !self.source.supports_pause() {
            warn!("Pause requested but the source does not support it");
            return PauseOutcome::Unsupported;
        }

        let resolution = match self.resolver.locate(today).await {
            Ok(resolution) => resolution,
            Err(err) => {
                error!(error = %err, "Failed to resolve delivery before pausing");
                return PauseOutcome::Failed(err);
            }
        };

        let Some(target) = resolution.target else {
            warn!("No pending delivery to pause");
            return PauseOutcome::NoPendingDelivery;
        };

        if resolution.is_paused {
            info!(date = %target.delivery_date, "Delivery already paused, nothing to do");
            return PauseOutcome::AlreadyPaused;
        }

        let (from, to) = pause_week(target.delivery_date);
        let week_start = from.date();

        match self.source.create_pause(from, to, false).await {
            Ok(()) => {
                info!(%week_start, "Paused delivery week");
                PauseOutcome::Paused { week_start, auto_cancelled: false }
            }
            Err(err) if err.is_conflict() => self.on_conflict(from, to, err).await,
            Err(err) => {
                error!(error = %err, kind = err.label(), "Pause request failed");
                PauseOutcome::Failed(err)
            }
        }
    }

    async fn on_conflict(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        conflict: HarvestError,
    ) -> PauseOutcome {
        let week_start = from.date();
        if !self.policy.auto_cancel_on_conflict {
            warn!(
                %week_start,
                error = %conflict,
                "Pause conflicts with a planned order and auto-cancel is disabled"
            );
            return PauseOutcome::Conflict;
        }

        warn!(%week_start, "Pause conflicts with a planned order, retrying with auto-cancel");
        match self.source.create_pause(from, to, true).await {
            Ok(()) => {
                info!(%week_start, "Paused delivery week, planned order cancelled");
                PauseOutcome::Paused { week_start, auto_cancelled: true }
            }
            Err(err) => {
                error!(error = %err, kind = err.label(), "Pause retry with auto-cancel failed");
                PauseOutcome::Failed(err)
            }
        }
    }

    /// Remove the pause covering the next delivery.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn unpause(&self, today: NaiveDate) -> PauseOutcome {
        if !self.source.supports_pause() {
            warn!("Unpause requested but the source does not support it");
            return PauseOutcome::Unsupported;
        }

        let resolution = match self.resolver.locate(today).await {
            Ok(resolution) => resolution,
            Err(err) => {
                error!(error = %err, "Failed to resolve delivery before unpausing");
                return PauseOutcome::Failed(err);
            }
        };

        let Some(target) = resolution.target else {
            warn!("No pending delivery to unpause");
            return PauseOutcome::NoPendingDelivery;
        };

        if !resolution.is_paused {
            info!(date = %target.delivery_date, "Delivery is not currently paused");
            return PauseOutcome::NotPaused;
        }

        let Some(pause_id) = removable_pause(&resolution.pauses, target.delivery_date)
            .and_then(|record| record.id.clone())
        else {
            error!(
                date = %target.delivery_date,
                pauses = resolution.pauses.len(),
                "Delivery is paused but no pause record with an id covers it"
            );
            return PauseOutcome::PauseRecordMissing;
        };

        match self.source.remove_pause(&pause_id).await {
            Ok(()) => {
                info!(%pause_id, "Removed pause");
                PauseOutcome::Resumed { pause_id }
            }
            Err(err) => {
                error!(%pause_id, error = %err, "Failed to remove pause");
                PauseOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pause_week_spans_monday_to_sunday() {
        // 2024-05-22 is a Wednesday
        let (from, to) = pause_week(date(2024, 5, 22));
        assert_eq!(from, date(2024, 5, 20).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(to.date(), date(2024, 5, 26));
        assert_eq!((to.hour(), to.minute(), to.second()), (23, 59, 59));
        assert_eq!(to.nanosecond(), 999_000_000);
    }

    #[test]
    fn pause_week_on_week_edges() {
        let (from, to) = pause_week(date(2024, 5, 20));
        assert_eq!(from.date(), date(2024, 5, 20));
        assert_eq!(to.date(), date(2024, 5, 26));

        let (from, to) = pause_week(date(2024, 5, 26));
        assert_eq!(from.date(), date(2024, 5, 20));
        assert_eq!(to.date(), date(2024, 5, 26));
    }

    #[test]
    fn pause_week_crosses_year_boundary() {
        let (from, to) = pause_week(date(2025, 1, 1));
        assert_eq!(from.date(), date(2024, 12, 30));
        assert_eq!(to.date(), date(2025, 1, 5));
    }

    #[test]
    fn only_applied_outcomes_are_true() {
        assert!(bool::from(PauseOutcome::Paused { week_start: date(2024, 1, 1), auto_cancelled: true }));
        assert!(bool::from(PauseOutcome::Resumed { pause_id: "1".into() }));
        assert!(!bool::from(PauseOutcome::AlreadyPaused));
        assert!(!bool::from(PauseOutcome::Conflict));
        assert!(!bool::from(PauseOutcome::Failed(HarvestError::Network("down".into()))));
    }

    #[test]
    fn policy_follows_config() {
        let policy = PausePolicy::from(&PauseConfig { auto_cancel_on_conflict: true });
        assert!(policy.auto_cancel_on_conflict);
        assert!(!PausePolicy::default().auto_cancel_on_conflict);
    }
}
