//! Named timer collection: naming, lifecycle and batched ticking

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{
    notify::{ChangeKind, Notifier, SubscriptionId},
    ordering::{sort_timers, SortOrder},
};
use crate::timer::Timer;

/// Name used when a caller supplies a blank base name
pub const DEFAULT_TIMER_NAME: &str = "Timer";

/// Number of active and finished timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub active: usize,
    pub finished: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.active + self.finished
    }
}

/// Result of one `tick_all` pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Some timer's remaining time changed
    pub values_changed: bool,
    /// Timers that crossed into the finished state during this pass
    pub just_finished: Vec<String>,
}

impl TickReport {
    pub fn structure_changed(&self) -> bool {
        !self.just_finished.is_empty()
    }
}

/// Why a rename was refused. The collection is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameError {
    /// New name is blank after trimming
    Empty,
    /// New name equals the old one
    Unchanged,
    /// No timer is registered under the old name
    NotFound,
    /// Another timer already owns the new name
    Taken,
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            RenameError::Empty => "new name is empty",
            RenameError::Unchanged => "new name is the same as the old name",
            RenameError::NotFound => "no timer with that name",
            RenameError::Taken => "a timer with that name already exists",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RenameError {}

#[derive(Debug, Clone)]
struct Entry {
    /// Insertion sequence, the final ordering tie-breaker
    seq: u64,
    timer: Timer,
}

/// Mapping from unique name to timer.
///
/// All mutation goes through these methods; callers only ever see cloned
/// snapshots. Operations must be serialized by the owner (a single event
/// loop, or a mutex around the collection).
#[derive(Debug, Default)]
pub struct TimerCollection {
    items: HashMap<String, Entry>,
    next_seq: u64,
    notifier: Notifier,
}

impl TimerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn on_values_changed<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut() + Send + 'static,
    {
        self.notifier.on_values_changed(observer)
    }

    pub fn on_structure_changed<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut() + Send + 'static,
    {
        self.notifier.on_structure_changed(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// First of `base`, `base 2`, `base 3`, ... not already in use
    pub fn generate_unique_name(&self, base: &str) -> String {
        let base = match base.trim() {
            "" => DEFAULT_TIMER_NAME,
            trimmed => trimmed,
        };
        let mut candidate = base.to_string();
        let mut suffix = 2u64;
        while self.items.contains_key(&candidate) {
            candidate = format!("{} {}", base, suffix);
            suffix += 1;
        }
        candidate
    }

    /// Create a running timer under a unique name derived from `base`.
    ///
    /// Inputs are taken as given; `duration_secs` is expected to be positive.
    pub fn add(&mut self, base: &str, duration_secs: u64, now: f64, metadata: Option<Value>) -> String {
        let name = self.generate_unique_name(base);
        let timer = Timer::new(name.clone(), duration_secs, now, metadata);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.insert(name.clone(), Entry { seq, timer });

        info!("Added timer '{}' ({}s)", name, duration_secs);
        self.notifier.emit(ChangeKind::Structure);
        name
    }

    /// Move a timer to a new key, all-or-nothing. Emits nothing.
    pub fn try_rename(&mut self, old_name: &str, new_name: &str) -> Result<String, RenameError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(RenameError::Empty);
        }
        if new_name == old_name {
            return Err(RenameError::Unchanged);
        }
        if !self.items.contains_key(old_name) {
            return Err(RenameError::NotFound);
        }
        if self.items.contains_key(new_name) {
            return Err(RenameError::Taken);
        }

        // Presence was checked above, nothing below can fail
        if let Some(mut entry) = self.items.remove(old_name) {
            entry.timer.set_name(new_name.to_string());
            self.items.insert(new_name.to_string(), entry);
        }
        info!("Renamed timer '{}' to '{}'", old_name, new_name);
        Ok(new_name.to_string())
    }

    /// Boolean form of [`try_rename`](Self::try_rename)
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> bool {
        self.try_rename(old_name, new_name).is_ok()
    }

    /// Delete a timer. Unknown names are ignored.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.items.remove(name).is_none() {
            return false;
        }
        info!("Removed timer '{}'", name);
        self.notifier.emit(ChangeKind::Structure);
        true
    }

    /// Delete every finished timer in one batch and return their names
    pub fn clear_finished(&mut self) -> Vec<String> {
        let mut finished: Vec<(u64, String)> = self
            .items
            .iter()
            .filter(|(_, entry)| entry.timer.is_finished())
            .map(|(name, entry)| (entry.seq, name.clone()))
            .collect();
        if finished.is_empty() {
            return Vec::new();
        }
        finished.sort_unstable();

        let removed: Vec<String> = finished.into_iter().map(|(_, name)| name).collect();
        for name in &removed {
            self.items.remove(name);
        }
        info!("Cleared {} finished timers", removed.len());
        self.notifier.emit(ChangeKind::Structure);
        removed
    }

    /// Pause or resume a timer. `None` when the name is unknown, otherwise
    /// whether the running flag actually changed.
    pub fn set_running(&mut self, name: &str, running: bool) -> Option<bool> {
        let changed = self.items.get_mut(name)?.timer.set_running(running);
        if changed {
            debug!("Timer '{}' {}", name, if running { "resumed" } else { "paused" });
            self.notifier.emit(ChangeKind::Values);
        }
        Some(changed)
    }

    /// Flip a timer between running and paused
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let running = self.items.get(name)?.timer.is_running();
        self.set_running(name, !running)
    }

    /// Advance every timer to `now` and notify each affected channel once
    pub fn tick_all(&mut self, now: f64) -> TickReport {
        let mut report = TickReport::default();
        for (name, entry) in self.items.iter_mut() {
            let outcome = entry.timer.tick(now);
            if outcome.value_changed() {
                report.values_changed = true;
            }
            if outcome.just_finished {
                report.just_finished.push(name.clone());
            }
        }

        if report.values_changed {
            self.notifier.emit(ChangeKind::Values);
        }
        if report.structure_changed() {
            report.just_finished.sort();
            self.notifier.emit(ChangeKind::Structure);
        }
        report
    }

    /// Snapshot of one timer
    pub fn get(&self, name: &str) -> Option<Timer> {
        self.items.get(name).map(|entry| entry.timer.clone())
    }

    /// Snapshot of every timer in insertion order
    pub fn all_items(&self) -> Vec<Timer> {
        let mut entries: Vec<&Entry> = self.items.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.timer.clone()).collect()
    }

    /// Snapshot ordered for presentation
    pub fn sorted_items(&self, order: SortOrder) -> Vec<Timer> {
        let mut timers = self.all_items();
        sort_timers(&mut timers, order);
        timers
    }

    pub fn counts(&self) -> Counts {
        let finished = self.items.values().filter(|entry| entry.timer.is_finished()).count();
        Counts {
            active: self.items.len() - finished,
            finished,
        }
    }
}
