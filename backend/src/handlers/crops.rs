//! HTTP handlers for crop preset lookups

use axum::Json;

use shared::{CropPreset, CROP_PRESETS};

/// List the crop presets available for GDD tracking
pub async fn list_crop_presets() -> Json<Vec<CropPreset>> {
    Json(CROP_PRESETS.to_vec())
}
