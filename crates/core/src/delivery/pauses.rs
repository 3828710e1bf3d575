//! Pause-record lookup shared by the resolver and the pause controller

use chrono::NaiveDate;
use harvest_domain::{FeedRecord, PauseRecord, ScheduleEntry};

/// Pause records contained in a schedule feed, in feed order.
pub fn pause_records(feed: &[FeedRecord]) -> Vec<PauseRecord> {
    feed.iter()
        .filter_map(|record| match record {
            FeedRecord::Pause(pause) => Some(pause.clone()),
            _ => None,
        })
        .collect()
}

/// A slot is paused when the feed flags it or any record covers its date.
pub fn is_paused(entry: &ScheduleEntry, pauses: &[PauseRecord]) -> bool {
    entry.flagged_paused() || pauses.iter().any(|pause| pause.covers(entry.delivery_date))
}

/// First record covering `date` that can actually be removed (has an id).
pub fn removable_pause(pauses: &[PauseRecord], date: NaiveDate) -> Option<&PauseRecord> {
    pauses.iter().find(|pause| pause.id.is_some() && pause.covers(date))
}
