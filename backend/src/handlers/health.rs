//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub station_channel: String,
    pub timezone: String,
    pub telegram: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Report whether the Telegram notifier is configured
    let telegram = if state.config.telegram.bot_token.is_empty()
        || state.config.telegram.chat_id.is_empty()
    {
        "not configured".to_string()
    } else {
        "configured".to_string()
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        station_channel: state.config.station.channel_id.to_string(),
        timezone: state.zone.to_string(),
        telegram,
    })
}
