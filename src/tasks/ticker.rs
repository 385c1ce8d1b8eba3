//! Periodic tick driver

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{collection::TickReport, state::AppState, utils::now_seconds};

/// Background task that advances every timer at a fixed cadence.
///
/// The cadence only controls refresh rate; elapsed time is always measured
/// from wall-clock instants, so late or skipped ticks lose nothing.
pub async fn ticker_task(state: Arc<AppState>, period: Duration) {
    info!("Starting ticker task ({}ms)", period.as_millis());

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        tick_once(&state, now_seconds());
    }
}

/// Run a single tick at `now` and log its outcome
pub fn tick_once(state: &AppState, now: f64) -> Option<TickReport> {
    match state.tick_all(now) {
        Ok(report) => {
            for name in &report.just_finished {
                info!("Timer '{}' finished", name);
            }
            if report.values_changed {
                debug!("Tick at {:.3} changed remaining time", now);
            }
            Some(report)
        }
        Err(e) => {
            error!("Failed to tick timers: {}", e);
            None
        }
    }
}
