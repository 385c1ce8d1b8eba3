//! Countdown state machine

use serde_json::Value;

use super::{Band, TimerStatus};

/// Text shown in place of `MM:SS` once a timer has finished
pub const DONE_TOKEN: &str = "Done";

/// A single named countdown advanced against wall-clock time
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    name: String,
    initial_duration_secs: u64,
    remaining_secs: u64,
    running: bool,
    /// Reference instant (UNIX seconds) for the next elapsed-time computation
    last_observed: f64,
    /// Opaque payload carried for the caller, never inspected here
    metadata: Option<Value>,
}

/// What a single `tick` did to a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_before: u64,
    pub remaining_after: u64,
    pub just_finished: bool,
}

impl TickOutcome {
    pub fn value_changed(&self) -> bool {
        self.remaining_before != self.remaining_after
    }
}

impl Timer {
    /// Create a running timer whose reference instant is `now`
    pub fn new(name: impl Into<String>, duration_secs: u64, now: f64, metadata: Option<Value>) -> Self {
        Self {
            name: name.into(),
            initial_duration_secs: duration_secs,
            remaining_secs: duration_secs,
            running: true,
            last_observed: now,
            metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn initial_duration_secs(&self) -> u64 {
        self.initial_duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_observed(&self) -> f64 {
        self.last_observed
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    pub fn status(&self) -> TimerStatus {
        if self.is_finished() {
            TimerStatus::Finished
        } else if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Paused
        }
    }

    /// Pause or resume. Returns true only when the flag actually changed;
    /// a finished timer is left untouched.
    pub fn set_running(&mut self, running: bool) -> bool {
        if self.is_finished() || self.running == running {
            return false;
        }
        self.running = running;
        true
    }

    /// Flip between running and paused. No-op once finished.
    pub fn toggle_running(&mut self) -> bool {
        let target = !self.running;
        self.set_running(target)
    }

    /// Advance the countdown to `now`.
    ///
    /// Elapsed time is measured from the stored reference instant, which
    /// only moves forward once a whole second has been charged. Paused or
    /// finished timers just follow the clock so paused time is never billed
    /// on resume.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        let remaining_before = self.remaining_secs;

        if !self.running || self.is_finished() {
            self.last_observed = now;
        } else {
            let delta = now - self.last_observed;
            // Also false for NaN and for a clock that moved backwards
            if delta >= 1.0 {
                let elapsed = delta.floor() as u64;
                self.remaining_secs = self.remaining_secs.saturating_sub(elapsed);
                self.last_observed = now;
            }
        }

        TickOutcome {
            remaining_before,
            remaining_after: self.remaining_secs,
            just_finished: remaining_before > 0 && self.remaining_secs == 0,
        }
    }

    pub fn band(&self) -> Band {
        Band::classify(self.remaining_secs, self.initial_duration_secs)
    }

    /// `MM:SS` of the remaining time, or [`DONE_TOKEN`] once finished
    pub fn display_text(&self) -> String {
        if self.is_finished() {
            return DONE_TOKEN.to_string();
        }
        let minutes = self.remaining_secs / 60;
        let seconds = self.remaining_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Fraction of the duration already consumed, in `[0, 1]`
    pub fn progress_fraction(&self) -> f64 {
        if self.initial_duration_secs == 0 {
            return 1.0;
        }
        let done = self.initial_duration_secs.saturating_sub(self.remaining_secs);
        (done as f64 / self.initial_duration_secs as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: f64 = 1_700_000_000.0;

    fn work() -> Timer {
        Timer::new("Work", 120, T0, None)
    }

    #[test]
    fn new_timer_is_running_with_full_duration() {
        let timer = work();
        assert_eq!(timer.remaining_secs(), 120);
        assert_eq!(timer.initial_duration_secs(), 120);
        assert!(timer.is_running());
        assert_eq!(timer.status(), TimerStatus::Running);
        assert_eq!(timer.last_observed(), T0);
        assert_eq!(timer.band(), Band::Safe);
    }

    #[test]
    fn each_timer_keeps_its_own_creation_instant() {
        let a = Timer::new("a", 10, T0, None);
        let b = Timer::new("b", 10, T0 + 42.0, None);
        assert_eq!(a.last_observed(), T0);
        assert_eq!(b.last_observed(), T0 + 42.0);
    }

    #[test]
    fn tick_charges_whole_elapsed_seconds() {
        let mut timer = work();
        let outcome = timer.tick(T0 + 119.0);
        assert_eq!(timer.remaining_secs(), 1);
        assert!(!timer.is_finished());
        assert_eq!(timer.band(), Band::Critical);
        assert!(outcome.value_changed());
        assert!(!outcome.just_finished);
    }

    #[test]
    fn tick_clamps_at_zero_and_reports_finish_once() {
        let mut timer = work();
        let first = timer.tick(T0 + 200.0);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(timer.is_finished());
        assert!(first.just_finished);

        let second = timer.tick(T0 + 300.0);
        assert!(!second.just_finished);
        assert!(!second.value_changed());
        assert_eq!(timer.status(), TimerStatus::Finished);
    }

    #[test]
    fn sub_second_ticks_accumulate_against_reference_point() {
        let mut timer = work();
        timer.tick(T0 + 0.6);
        assert_eq!(timer.remaining_secs(), 120);
        assert_eq!(timer.last_observed(), T0);

        // 1.2s since the reference instant, not 0.6s since the last call
        timer.tick(T0 + 1.2);
        assert_eq!(timer.remaining_secs(), 119);
        assert_eq!(timer.last_observed(), T0 + 1.2);

        timer.tick(T0 + 2.1);
        assert_eq!(timer.remaining_secs(), 119);
        timer.tick(T0 + 2.3);
        assert_eq!(timer.remaining_secs(), 118);
    }

    #[test]
    fn backward_clock_is_ignored() {
        let mut timer = work();
        timer.tick(T0 + 10.0);
        let outcome = timer.tick(T0 + 5.0);
        assert!(!outcome.value_changed());
        assert_eq!(timer.remaining_secs(), 110);
        assert_eq!(timer.last_observed(), T0 + 10.0);

        timer.tick(T0 + 12.0);
        assert_eq!(timer.remaining_secs(), 108);
    }

    #[test]
    fn ticking_twice_with_same_instant_is_idempotent() {
        let mut timer = work();
        timer.tick(T0 + 30.5);
        let snapshot = timer.clone();
        let outcome = timer.tick(T0 + 30.5);
        assert!(!outcome.value_changed());
        assert_eq!(timer, snapshot);
    }

    #[test]
    fn paused_time_is_not_charged_on_resume() {
        let mut timer = work();
        timer.tick(T0 + 60.0);
        assert_eq!(timer.remaining_secs(), 60);

        assert!(timer.set_running(false));
        timer.tick(T0 + 500.0);
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(timer.status(), TimerStatus::Paused);

        assert!(timer.set_running(true));
        timer.tick(T0 + 505.0);
        assert_eq!(timer.remaining_secs(), 55);
    }

    #[test]
    fn finished_timer_cannot_be_resumed_or_paused() {
        let mut timer = work();
        timer.tick(T0 + 500.0);
        assert!(!timer.toggle_running());
        assert!(!timer.set_running(false));
        assert!(timer.is_running());
        assert_eq!(timer.status(), TimerStatus::Finished);
    }

    #[test]
    fn toggle_flips_between_running_and_paused() {
        let mut timer = work();
        assert!(timer.toggle_running());
        assert!(!timer.is_running());
        assert!(timer.toggle_running());
        assert!(timer.is_running());
        assert!(!timer.set_running(true));
    }

    #[test]
    fn display_text_formats_minutes_and_seconds() {
        let mut timer = Timer::new("Long", 25 * 60, T0, None);
        assert_eq!(timer.display_text(), "25:00");
        timer.tick(T0 + 61.0);
        assert_eq!(timer.display_text(), "23:59");
        timer.tick(T0 + 25.0 * 60.0);
        assert_eq!(timer.display_text(), DONE_TOKEN);
    }

    #[test]
    fn progress_fraction_tracks_consumed_time() {
        let mut timer = work();
        assert_eq!(timer.progress_fraction(), 0.0);
        timer.tick(T0 + 30.0);
        assert!((timer.progress_fraction() - 0.25).abs() < 1e-9);
        timer.tick(T0 + 1000.0);
        assert_eq!(timer.progress_fraction(), 1.0);
        assert_eq!(timer.band(), Band::Muted);
    }

    #[test]
    fn zero_duration_reports_full_progress() {
        let timer = Timer::new("empty", 0, T0, None);
        assert!(timer.is_finished());
        assert_eq!(timer.progress_fraction(), 1.0);
    }

    #[test]
    fn metadata_is_carried_untouched() {
        let labels = serde_json::json!({ "owner": "ops", "tags": ["tea"] });
        let mut timer = Timer::new("Tea", 180, T0, Some(labels.clone()));
        timer.tick(T0 + 200.0);
        assert_eq!(timer.metadata(), Some(&labels));
    }
}
