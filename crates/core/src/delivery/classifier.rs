//! Schedule classification
//!
//! Turns the raw schedule feed into the ordered list of slots that can still
//! result in a delivery. Pure: no I/O, "today" is passed in.

use chrono::NaiveDate;
use harvest_domain::{FeedRecord, ScheduleEntry};

/// Actionable slots on or after `today`, earliest first.
///
/// Keeps pending and in-progress slots that carry an order id. Ties on the
/// delivery date are broken by ascending order id. Non-slot records in the
/// feed are ignored.
pub fn classify(feed: &[FeedRecord], today: NaiveDate) -> Vec<ScheduleEntry> {
    let mut candidates: Vec<ScheduleEntry> = feed
        .iter()
        .filter_map(|record| match record {
            FeedRecord::Delivery(entry) => Some(entry),
            FeedRecord::Pause(_) | FeedRecord::Other { .. } => None,
        })
        .filter(|entry| is_candidate(entry, today))
        .cloned()
        .collect();

    candidates.sort_by(|a, b| {
        a.delivery_date.cmp(&b.delivery_date).then_with(|| a.order_id.cmp(&b.order_id))
    });
    candidates
}

/// First actionable slot, if any.
pub fn next_candidate(feed: &[FeedRecord], today: NaiveDate) -> Option<ScheduleEntry> {
    classify(feed, today).into_iter().next()
}

fn is_candidate(entry: &ScheduleEntry, today: NaiveDate) -> bool {
    entry.order_state.is_actionable() && entry.has_planned_order() && entry.delivery_date >= today
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use harvest_domain::{OrderState, PauseRecord};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn slot(offset_days: i64, order_id: i64, state: OrderState) -> FeedRecord {
        FeedRecord::Delivery(ScheduleEntry::new(
            today() + Duration::days(offset_days),
            order_id,
            state,
        ))
    }

    #[test]
    fn empty_feed_yields_no_candidates() {
        assert!(classify(&[], today()).is_empty());
    }

    #[test]
    fn drops_done_cancelled_and_unknown_states() {
        let feed = vec![
            slot(1, 10, OrderState::Done),
            slot(2, 11, OrderState::Cancelled),
            slot(3, 12, OrderState::Other(7)),
            slot(4, 13, OrderState::InProgress),
        ];

        let candidates = classify(&feed, today());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].order_id, 13);
    }

    #[test]
    fn drops_slots_without_order() {
        let feed = vec![slot(1, 0, OrderState::Pending), slot(2, 5, OrderState::Pending)];
        let candidates = classify(&feed, today());
        assert_eq!(candidates.iter().map(|c| c.order_id).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn today_is_kept_and_yesterday_is_dropped() {
        let feed = vec![slot(-1, 1, OrderState::Pending), slot(0, 2, OrderState::Pending)];
        let candidates = classify(&feed, today());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].delivery_date, today());
    }

    #[test]
    fn sorts_by_date_then_order_id() {
        let feed = vec![
            slot(7, 30, OrderState::Pending),
            slot(3, 22, OrderState::Pending),
            slot(3, 21, OrderState::InProgress),
            slot(5, 1, OrderState::Pending),
        ];

        let order: Vec<i64> = classify(&feed, today()).iter().map(|c| c.order_id).collect();
        assert_eq!(order, vec![21, 22, 1, 30]);
    }

    #[test]
    fn ignores_pause_and_foreign_records() {
        let feed = vec![
            FeedRecord::Pause(PauseRecord::day("p1", today())),
            FeedRecord::Other { kind: "Holiday".into() },
            slot(2, 9, OrderState::Pending),
        ];

        let next = next_candidate(&feed, today()).unwrap();
        assert_eq!(next.order_id, 9);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let mut feed = vec![
            slot(2, 4, OrderState::Pending),
            slot(2, 3, OrderState::Pending),
            slot(1, 8, OrderState::Pending),
            slot(9, 2, OrderState::InProgress),
            slot(-3, 1, OrderState::Pending),
        ];
        let expected = classify(&feed, today());

        feed.reverse();
        assert_eq!(classify(&feed, today()), expected);
        feed.swap(0, 3);
        assert_eq!(classify(&feed, today()), expected);

        for candidate in &expected {
            assert!(candidate.order_state.is_actionable());
            assert_ne!(candidate.order_id, 0);
            assert!(candidate.delivery_date >= today());
        }
    }
}
