//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    collection::{RenameError, SortOrder},
    state::{AppState, RemoveOutcome},
    utils::now_seconds,
};
use super::responses::{
    ClearFinishedResponse, CreateTimerRequest, ErrorResponse, HealthResponse, ListQuery,
    RemoveQuery, RenameRequest, StatusResponse, TimerListResponse, TimerView,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

fn internal(context: &str, e: String) -> ApiError {
    error!("{}: {}", context, e);
    reject(StatusCode::INTERNAL_SERVER_ERROR, e)
}

/// Handle POST /timers - Create a timer under a unique name
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTimerRequest>,
) -> Result<(StatusCode, Json<TimerView>), ApiError> {
    if request.duration_seconds == Some(0) {
        warn!("Rejected timer '{}' with zero duration", request.name);
        return Err(reject(StatusCode::BAD_REQUEST, "duration_seconds must be positive"));
    }

    let timer = state
        .add_timer(&request.name, request.duration_seconds, request.metadata, now_seconds())
        .map_err(|e| internal("Failed to add timer", e))?;
    Ok((StatusCode::CREATED, Json(TimerView::from(&timer))))
}

/// Handle GET /timers - List timers in presentation order
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TimerListResponse>, ApiError> {
    let order = SortOrder::from_group_active_first(query.group_active_first);
    let timers = state
        .list_timers(order)
        .map_err(|e| internal("Failed to list timers", e))?;
    let counts = state.counts().map_err(|e| internal("Failed to count timers", e))?;

    Ok(Json(TimerListResponse {
        timers: timers.iter().map(TimerView::from).collect(),
        counts,
    }))
}

/// Handle GET /timers/:name - Single timer snapshot
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<TimerView>, ApiError> {
    match state.get_timer(&name) {
        Ok(Some(timer)) => Ok(Json(TimerView::from(&timer))),
        Ok(None) => Err(reject(StatusCode::NOT_FOUND, format!("no timer named '{}'", name))),
        Err(e) => Err(internal("Failed to read timer", e)),
    }
}

/// Handle POST /timers/:name/rename - Atomic rename
pub async fn rename_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<TimerView>, ApiError> {
    match state.rename_timer(&name, &request.new_name) {
        Ok(Ok(timer)) => Ok(Json(TimerView::from(&timer))),
        Ok(Err(rejection)) => {
            let status = match rejection {
                RenameError::Empty | RenameError::Unchanged => StatusCode::BAD_REQUEST,
                RenameError::NotFound => StatusCode::NOT_FOUND,
                RenameError::Taken => StatusCode::CONFLICT,
            };
            info!("Rename of '{}' rejected: {}", name, rejection);
            Err(reject(status, rejection.to_string()))
        }
        Err(e) => Err(internal("Failed to rename timer", e)),
    }
}

/// Handle POST /timers/:name/toggle - Pause or resume
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<TimerView>, ApiError> {
    match state.toggle_timer(&name) {
        Ok(Some(timer)) => Ok(Json(TimerView::from(&timer))),
        Ok(None) => Err(reject(StatusCode::NOT_FOUND, format!("no timer named '{}'", name))),
        Err(e) => Err(internal("Failed to toggle timer", e)),
    }
}

/// Handle DELETE /timers/:name - Remove a timer, idempotently
pub async fn remove_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<RemoveQuery>,
) -> Result<StatusCode, ApiError> {
    match state.remove_timer(&name, query.force) {
        Ok(RemoveOutcome::Removed) | Ok(RemoveOutcome::Absent) => Ok(StatusCode::NO_CONTENT),
        Ok(RemoveOutcome::StillActive) => Err(reject(
            StatusCode::CONFLICT,
            format!("timer '{}' is still active; pass force=true to remove it", name),
        )),
        Err(e) => Err(internal("Failed to remove timer", e)),
    }
}

/// Handle POST /clear-finished - Drop all finished timers
pub async fn clear_finished_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearFinishedResponse>, ApiError> {
    let (removed, counts) = state
        .clear_finished()
        .map_err(|e| internal("Failed to clear finished timers", e))?;
    Ok(Json(ClearFinishedResponse { removed, counts }))
}

/// Handle GET /status - Return counts and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let counts = match state.counts() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get timer counts: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        counts,
        default_duration_seconds: state.default_duration_secs,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
