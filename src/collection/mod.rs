//! Timer collection module
//!
//! Owns a set of uniquely named timers, drives them in batches and reports
//! value and structure changes to subscribers.

pub mod notify;
pub mod ordering;
pub mod timer_collection;

// Re-export main types
pub use notify::{ChangeKind, Notifier, SubscriptionId};
pub use ordering::{sort_timers, SortOrder};
pub use timer_collection::{Counts, RenameError, TickReport, TimerCollection, DEFAULT_TIMER_NAME};
