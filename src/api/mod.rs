//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/timer/duration", post(set_duration_handler))
        .route("/timer/presets", get(presets_handler))
        .route("/timer/presets/:label", post(apply_preset_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/stop", post(stop_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/settings/test", post(test_notification_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
