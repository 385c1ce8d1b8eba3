//! HTTP API module
//!
//! JSON endpoints exposing the timer collection.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(create_timer_handler))
        .route("/clear-finished", post(clear_finished_handler))
        .route("/timers/:name", get(get_timer_handler).delete(remove_timer_handler))
        .route("/timers/:name/rename", post(rename_timer_handler))
        .route("/timers/:name/toggle", post(toggle_timer_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
