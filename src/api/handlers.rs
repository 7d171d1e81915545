//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{Local, Timelike};
use tracing::{error, info};

use crate::{
    state::AppState,
    tasks::countdown_session_task,
    timer::{resolve, Announce, StartRequest},
};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

type ApiError = (StatusCode, Json<ApiResponse>);

fn internal_error(state: &AppState, message: String) -> ApiError {
    error!("{}", message);
    let timer = state.get_timer_state().unwrap_or_default();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(message, timer)),
    )
}

/// Handle POST /start - Resolve the request and start a countdown session
///
/// Any active session (scheduled wait included) is cancelled first, so a
/// restart is idempotent and only one trigger ever ticks.
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let now = Local::now();
    let now_minutes = now.hour() * 60 + now.minute();

    let resolved = match resolve(&request, now_minutes) {
        Ok(resolved) => resolved,
        Err(e) => {
            info!("Start request rejected: {}", e);
            let timer = state.get_timer_state().unwrap_or_default();
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(e.to_string(), timer)),
            ));
        }
    };

    // Cancel the previous session, waiting for its last tick to retire,
    // before spawning its replacement
    match state.stop_session().await {
        Ok(true) => info!("Replaced an active session"),
        Ok(false) => {}
        Err(e) => return Err(internal_error(&state, e)),
    }

    state.record_action("start");

    let scheduled = resolved.scheduled_start.clone();
    let handle = tokio::spawn(countdown_session_task(
        Arc::clone(&state),
        resolved,
        state.announcer.clone(),
    ));
    if let Err(e) = state.store_session(handle) {
        return Err(internal_error(&state, e));
    }

    let timer = state
        .get_timer_state()
        .map_err(|e| internal_error(&state, e))?;

    let response = match scheduled {
        Some(start) => {
            info!("Start endpoint called - countdown scheduled for {}", start);
            ApiResponse::scheduled(format!("Timer will start at {}.", start), timer)
        }
        None => {
            info!("Start endpoint called - countdown started");
            ApiResponse::started("Countdown started".to_string(), timer)
        }
    };
    Ok(Json(response))
}

/// Handle POST /cancel - Abort the active session and return to idle
pub async fn cancel_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    // Abort and wait for the task first, so no in-flight tick can publish
    // a running snapshot after the reset below
    let had_session = state
        .stop_session()
        .await
        .map_err(|e| internal_error(&state, e))?;

    if let Err(e) = state.reset_to_idle() {
        return Err(internal_error(&state, e));
    }

    let timer = state
        .get_timer_state()
        .map_err(|e| internal_error(&state, e))?;

    if had_session {
        state.record_action("cancel");
        state.announcer.announce("Countdown cancelled.");
        info!("Cancel endpoint called - session cancelled");
        Ok(Json(ApiResponse::cancelled(
            "Countdown cancelled".to_string(),
            timer,
        )))
    } else {
        info!("Cancel endpoint called - no active session");
        Ok(Json(ApiResponse::cancelled(
            "No active countdown".to_string(),
            timer,
        )))
    }
}

/// Handle GET /status - Return current timer and display snapshots
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let display = match state.get_display_state() {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to get display state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        display,
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
