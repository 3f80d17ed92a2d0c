//! Route definitions for the Agricultural Weather Station Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Station readings and derived metrics
        .nest("/readings", readings_routes())
        // Crop presets for GDD tracking
        .nest("/crops", crops_routes())
}

/// Station readings routes
fn readings_routes() -> Router<AppState> {
    Router::new()
        // Live channel data
        .route("/", get(handlers::get_readings))
        // Operator CSV uploads
        .route("/upload", post(handlers::upload_readings))
        // Published monthly archive
        .route("/archive", get(handlers::get_archive_readings))
        // CSV download
        .route("/export", get(handlers::export_readings))
}

/// Crop preset routes
fn crops_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_crop_presets))
}
