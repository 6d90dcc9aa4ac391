//! HTTP endpoint handlers

use std::{path::PathBuf, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{error::AppError, state::AppState};
use super::{
    extract::{BodyRejection, OptionalJson},
    responses::{ApiResponse, HealthResponse, InputRequest, SoundRequest, StatusResponse},
};

type HandlerResult<T> = Result<Json<T>, (StatusCode, Json<ApiResponse>)>;

/// Map an application error to a status code with the current timer attached
fn failure(state: &AppState, e: AppError) -> (StatusCode, Json<ApiResponse>) {
    let status = match e {
        AppError::Playback(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ApiResponse::error(e.to_string(), &state.get_timer_state())),
    )
}

/// Reject an unusable body without touching any state
fn bad_body(state: &AppState, rejection: BodyRejection) -> (StatusCode, Json<ApiResponse>) {
    warn!("Rejected request body: {}", rejection.message);
    (
        rejection.status,
        Json(ApiResponse::error(rejection.message, &state.get_timer_state())),
    )
}

/// Handle POST /input - Store hours, minutes and seconds
pub async fn input_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<InputRequest>, JsonRejection>,
) -> HandlerResult<ApiResponse> {
    let Json(request) = request.map_err(|e| bad_body(&state, e.into()))?;

    match state.set_input(request.to_input()) {
        Ok(input) => Ok(Json(ApiResponse::ok(
            format!(
                "Input set to {} seconds",
                input.total_seconds()
            ),
            &state.get_timer_state(),
        ))),
        Err(e) => {
            error!("Failed to store timer input: {}", e);
            Err(failure(&state, e))
        }
    }
}

/// Handle POST /sound - Select the alarm sound
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    request: Result<OptionalJson<SoundRequest>, BodyRejection>,
) -> HandlerResult<ApiResponse> {
    let OptionalJson(request) = request.map_err(|e| bad_body(&state, e))?;
    let selection = request.and_then(|request| request.path).map(PathBuf::from);

    match state.select_audio(selection) {
        Ok(audio) => Ok(Json(ApiResponse::ok(
            format!("Sound selected: {}", audio),
            &state.get_timer_state(),
        ))),
        Err(e) => {
            warn!("Sound selection failed: {}", e);
            Err(failure(&state, e))
        }
    }
}

/// Handle POST /start - Start the countdown, optionally with new input
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    request: Result<OptionalJson<InputRequest>, BodyRejection>,
) -> HandlerResult<ApiResponse> {
    let OptionalJson(request) = request.map_err(|e| bad_body(&state, e))?;
    if let Some(request) = request {
        if let Err(e) = state.set_input(request.to_input()) {
            error!("Failed to store timer input: {}", e);
            return Err(failure(&state, e));
        }
    }

    match state.start_timer() {
        Ok(timer) => {
            info!("Start endpoint called - countdown of {}", timer.formatted());
            Ok(Json(ApiResponse::ok("Timer started".to_string(), &timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(failure(&state, e))
        }
    }
}

/// Handle POST /stop - Stop the countdown and any alarm
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.stop_timer();
    info!("Stop endpoint called - timer stopped");
    Json(ApiResponse::ok("Timer stopped".to_string(), &timer))
}

/// Handle GET /status - Return the current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> HandlerResult<StatusResponse> {
    let input = state.get_input().map_err(|e| failure(&state, e))?;
    let sound = state.get_audio().map_err(|e| failure(&state, e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: (&state.get_timer_state()).into(),
        input,
        sound,
        player: state.get_player_state(),
        player_sound: state.get_player_audio(),
        player_error: state.get_player_error(),
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
