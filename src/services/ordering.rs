use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::entities::placed_entry;

/// Display order: tile ascending, priority entries first, then rank ascending.
/// Creation time and id break the remaining ties so the order is total.
pub fn display_order(a: &placed_entry::Model, b: &placed_entry::Model) -> Ordering {
    a.tile
        .cmp(&b.tile)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.rank.cmp(&b.rank))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_for_display(entries: &mut [placed_entry::Model]) {
    entries.sort_by(display_order);
}

/// An entry is live when it is active and `now` falls inside its window, both ends
/// included. Entries without a window are live whenever they are active.
pub fn is_live(entry: &placed_entry::Model, now: DateTime<Utc>) -> bool {
    if !entry.is_active() {
        return false;
    }
    match (entry.start_date_time, entry.end_date_time) {
        (Some(start), Some(end)) => start <= now && now <= end,
        (None, None) => true,
        // Half-open windows never pass validation; treat them as not scheduled to show.
        _ => false,
    }
}

pub fn live_projection(
    entries: Vec<placed_entry::Model>,
    now: DateTime<Utc>,
) -> Vec<placed_entry::Model> {
    let mut live: Vec<_> = entries.into_iter().filter(|e| is_live(e, now)).collect();
    sort_for_display(&mut live);
    live
}
