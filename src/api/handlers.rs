//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use chrono::Utc;
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::WatchStream;
use tracing::{error, info, warn};

use crate::{
    duration::{DurationInput, Preset, PRESETS},
    state::{AppState, CountdownState, NotificationSettings},
};
use super::responses::{
    ErrorResponse, HealthResponse, StatusResponse, TestNotificationResponse, TimerResponse,
    TimerView,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn timer_result(
    result: Result<CountdownState, String>,
    message: &str,
    failure_status: StatusCode,
) -> Result<Json<TimerResponse>, ApiError> {
    match result {
        Ok(state) => Ok(Json(TimerResponse::new(message, &state))),
        Err(e) => {
            warn!("{}: {}", message, e);
            Err((failure_status, Json(ErrorResponse::new(e))))
        }
    }
}

/// Handle GET /status - Return the timer view and server information
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let countdown = match state.get_countdown_state() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get countdown state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: TimerView::from_state(&countdown),
        notification_service: state.get_settings().service,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream the timer view on every engine change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Timer event stream opened");
    let stream = WatchStream::new(state.engine.watch()).map(|countdown| {
        let view = TimerView::from_state(&countdown);
        let event = Event::default()
            .event("timer")
            .json_data(&view)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
        Ok(event)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle POST /timer/duration - Set the countdown from hours/minutes/seconds
pub async fn set_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<DurationInput>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_result(
        state.set_duration(input),
        "Duration set",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// Handle GET /timer/presets - List quick-pick durations
pub async fn presets_handler() -> Json<Vec<Preset>> {
    Json(PRESETS.to_vec())
}

/// Handle POST /timer/presets/:label - Set the countdown from a preset
pub async fn apply_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let Some(preset) = Preset::find(&label) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Unknown preset: {}", label))),
        ));
    };
    timer_result(
        state.set_duration(preset.input()),
        "Preset applied",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// Handle POST /timer/start - Start counting down
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_result(state.start_timer(), "Timer started", StatusCode::CONFLICT)
}

/// Handle POST /timer/stop - Stop counting down
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_result(
        state.stop_timer(),
        "Timer stopped",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// Handle POST /timer/reset - Restore the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerResponse>, ApiError> {
    timer_result(
        state.reset_timer(),
        "Timer reset",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// Handle GET /settings - Return the notification settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Json<NotificationSettings> {
    Json(state.get_settings())
}

/// Handle PUT /settings - Replace and persist the notification settings
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<NotificationSettings>,
) -> Result<Json<NotificationSettings>, ApiError> {
    state.update_settings(settings).map(Json).map_err(|e| {
        error!("{}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e)))
    })
}

/// Handle POST /settings/test - Send a test notification with the given settings
pub async fn test_notification_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<NotificationSettings>,
) -> Json<TestNotificationResponse> {
    info!("Sending test notification via {}", settings.service.as_str());
    let outcome = state.notifier.test(&settings).await;
    Json(TestNotificationResponse {
        outcome,
        service: settings.service,
        timestamp: Utc::now(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
