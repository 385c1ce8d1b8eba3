//! Deterministic presentation order

use std::cmp::Ordering;

use crate::timer::Timer;

/// How a listing is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Active before finished, then least remaining time, then name
    #[default]
    GroupActiveFirst,
    /// Case-insensitive name only
    ByName,
}

impl SortOrder {
    pub fn from_group_active_first(group_active_first: bool) -> Self {
        if group_active_first {
            SortOrder::GroupActiveFirst
        } else {
            SortOrder::ByName
        }
    }

    pub fn compare(&self, a: &Timer, b: &Timer) -> Ordering {
        match self {
            SortOrder::GroupActiveFirst => a
                .is_finished()
                .cmp(&b.is_finished())
                .then_with(|| a.remaining_secs().cmp(&b.remaining_secs()))
                .then_with(|| compare_names(a.name(), b.name())),
            SortOrder::ByName => compare_names(a.name(), b.name()),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Stable sort, so full ties keep the incoming (insertion) order
pub fn sort_timers(timers: &mut [Timer], order: SortOrder) {
    timers.sort_by(|a, b| order.compare(a, b));
}
