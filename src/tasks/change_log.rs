//! Change notification listener

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, trace, warn};

use crate::{collection::ChangeKind, state::AppState};

/// Background task that logs collection changes as they are broadcast
pub async fn change_log_task(state: Arc<AppState>) {
    info!("Starting change log task");

    let mut change_rx = state.change_tx.subscribe();

    loop {
        match change_rx.recv().await {
            Ok(ChangeKind::Structure) => match state.counts() {
                Ok(counts) => info!(
                    "Timer list changed: {} active, {} finished",
                    counts.active, counts.finished
                ),
                Err(e) => warn!("Failed to read counts: {}", e),
            },
            Ok(ChangeKind::Values) => trace!("Timer values changed"),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Change log lagged, skipped {} notifications", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Change channel closed, stopping change log task");
                break;
            }
        }
    }
}
