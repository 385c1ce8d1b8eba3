//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::trace;

use crate::{
    collection::{ChangeKind, Counts, RenameError, SortOrder, TickReport, TimerCollection},
    timer::Timer,
};

/// Outcome of a remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing was registered under the name
    Absent,
    /// The timer has not finished and removal was not forced
    StillActive,
}

/// Shared server state wrapping the timer collection
#[derive(Debug)]
pub struct AppState {
    /// Timer collection; the mutex serializes the ticker and HTTP handlers
    timers: Mutex<TimerCollection>,
    /// Duration used when a create request omits one
    pub default_duration_secs: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Collection change notifications, fanned out to async listeners
    pub change_tx: broadcast::Sender<ChangeKind>,
}

impl AppState {
    /// Create a new AppState with an empty collection
    pub fn new(port: u16, host: String, default_duration_secs: u64) -> Self {
        let (change_tx, _) = broadcast::channel(100);

        let mut timers = TimerCollection::new();
        for kind in [ChangeKind::Values, ChangeKind::Structure] {
            let tx = change_tx.clone();
            let forward = move || {
                // No listeners is fine
                if tx.send(kind).is_err() {
                    trace!("No listeners for {:?} change", kind);
                }
            };
            match kind {
                ChangeKind::Values => timers.on_values_changed(forward),
                ChangeKind::Structure => timers.on_structure_changed(forward),
            };
        }

        Self {
            timers: Mutex::new(timers),
            default_duration_secs,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            change_tx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimerCollection>, String> {
        self.timers
            .lock()
            .map_err(|e| format!("Failed to lock timer collection: {}", e))
    }

    /// Record the last mutating action
    fn record(&self, action: String) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Add a timer and return its snapshot
    pub fn add_timer(
        &self,
        base: &str,
        duration_secs: Option<u64>,
        metadata: Option<Value>,
        now: f64,
    ) -> Result<Timer, String> {
        let duration = duration_secs.unwrap_or(self.default_duration_secs);
        let mut timers = self.lock()?;
        let name = timers.add(base, duration, now, metadata);
        let timer = timers
            .get(&name)
            .ok_or_else(|| format!("Timer '{}' vanished after insert", name))?;
        drop(timers);

        self.record(format!("add {}", name));
        Ok(timer)
    }

    pub fn rename_timer(&self, old_name: &str, new_name: &str) -> Result<Result<Timer, RenameError>, String> {
        let mut timers = self.lock()?;
        let renamed = match timers.try_rename(old_name, new_name) {
            Ok(name) => name,
            Err(e) => return Ok(Err(e)),
        };
        let timer = timers.get(&renamed).ok_or_else(|| format!("Timer '{}' vanished after rename", renamed))?;
        drop(timers);

        self.record(format!("rename {} -> {}", old_name, renamed));
        Ok(Ok(timer))
    }

    /// Pause/resume; `None` when the timer does not exist
    pub fn toggle_timer(&self, name: &str) -> Result<Option<Timer>, String> {
        let mut timers = self.lock()?;
        let changed = match timers.toggle(name) {
            Some(changed) => changed,
            None => return Ok(None),
        };
        let timer = timers.get(name);
        drop(timers);

        if changed {
            self.record(format!("toggle {}", name));
        }
        Ok(timer)
    }

    /// Remove a timer; an unfinished one needs `force`
    pub fn remove_timer(&self, name: &str, force: bool) -> Result<RemoveOutcome, String> {
        let mut timers = self.lock()?;
        let finished = match timers.get(name) {
            Some(timer) => timer.is_finished(),
            None => return Ok(RemoveOutcome::Absent),
        };
        if !finished && !force {
            return Ok(RemoveOutcome::StillActive);
        }
        timers.remove(name);
        drop(timers);

        self.record(format!("remove {}", name));
        Ok(RemoveOutcome::Removed)
    }

    /// Remove all finished timers, returning their names and the new counts
    pub fn clear_finished(&self) -> Result<(Vec<String>, Counts), String> {
        let mut timers = self.lock()?;
        let removed = timers.clear_finished();
        let counts = timers.counts();
        drop(timers);

        if !removed.is_empty() {
            self.record("clear-finished".to_string());
        }
        Ok((removed, counts))
    }

    /// Advance every timer to `now`
    pub fn tick_all(&self, now: f64) -> Result<TickReport, String> {
        let mut timers = self.lock()?;
        Ok(timers.tick_all(now))
    }

    pub fn get_timer(&self, name: &str) -> Result<Option<Timer>, String> {
        Ok(self.lock()?.get(name))
    }

    pub fn list_timers(&self, order: SortOrder) -> Result<Vec<Timer>, String> {
        Ok(self.lock()?.sorted_items(order))
    }

    pub fn counts(&self) -> Result<Counts, String> {
        Ok(self.lock()?.counts())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: f64 = 1_700_000_000.0;

    fn state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), 60)
    }

    #[test]
    fn add_uses_default_duration_and_records_action() {
        let state = state();
        let timer = state.add_timer("", None, None, T0).unwrap();
        assert_eq!(timer.name(), "Timer");
        assert_eq!(timer.initial_duration_secs(), 60);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("add Timer"));
        assert!(time.is_some());
        assert_eq!(state.counts().unwrap().active, 1);
    }

    #[test]
    fn remove_requires_force_for_active_timer() {
        let state = state();
        state.add_timer("Work", Some(120), None, T0).unwrap();

        assert_eq!(state.remove_timer("Work", false).unwrap(), RemoveOutcome::StillActive);
        assert!(state.get_timer("Work").unwrap().is_some());
        assert_eq!(state.remove_timer("Work", true).unwrap(), RemoveOutcome::Removed);
        assert_eq!(state.remove_timer("Work", true).unwrap(), RemoveOutcome::Absent);
    }

    #[test]
    fn finished_timer_is_removed_without_force() {
        let state = state();
        state.add_timer("Egg", Some(5), None, T0).unwrap();
        state.tick_all(T0 + 6.0).unwrap();
        assert_eq!(state.remove_timer("Egg", false).unwrap(), RemoveOutcome::Removed);
    }

    #[test]
    fn rename_surfaces_rejection_reason() {
        let state = state();
        state.add_timer("a", Some(10), None, T0).unwrap();
        state.add_timer("b", Some(10), None, T0).unwrap();
        assert_eq!(state.rename_timer("a", "b").unwrap(), Err(RenameError::Taken));
        let renamed = state.rename_timer("a", "c").unwrap().unwrap();
        assert_eq!(renamed.name(), "c");
    }

    #[tokio::test]
    async fn collection_changes_reach_broadcast_listeners() {
        let state = state();
        let mut rx = state.change_tx.subscribe();

        state.add_timer("Egg", Some(5), None, T0).unwrap();
        assert_eq!(rx.recv().await.unwrap(), ChangeKind::Structure);

        let report = state.tick_all(T0 + 10.0).unwrap();
        assert_eq!(report.just_finished, vec!["Egg".to_string()]);
        assert_eq!(rx.recv().await.unwrap(), ChangeKind::Values);
        assert_eq!(rx.recv().await.unwrap(), ChangeKind::Structure);
        assert_eq!(state.counts().unwrap(), Counts { active: 0, finished: 1 });
    }
}
