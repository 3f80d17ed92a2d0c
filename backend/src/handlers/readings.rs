//! HTTP handlers for station readings and derived metrics

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use shared::{CropKind, DateRange, Granularity};

use crate::error::{AppError, AppResult};
use crate::external::{ArchiveClient, StationClient, TelegramNotifier};
use crate::services::dashboard::{DashboardData, DashboardService, PipelineRequest};
use crate::services::{ExportService, UploadService};
use crate::AppState;

// ============================================================================
// Query Types
// ============================================================================

/// Query parameters accepted by every readings endpoint.
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub granularity: Option<Granularity>,
    pub crop: Option<CropKind>,
    pub base_temp: Option<f64>,
    pub gdd_threshold: Option<f64>,
    pub rain_threshold_minutes: Option<u32>,
}

impl ReadingsQuery {
    fn into_request(self, default_rain_threshold: u32) -> PipelineRequest {
        PipelineRequest {
            range: DateRange {
                start: self.start_date,
                end: self.end_date,
            },
            granularity: self.granularity.unwrap_or_default(),
            crop: self.crop,
            base_temp: self.base_temp,
            gdd_threshold: self.gdd_threshold,
            rain_threshold_minutes: self
                .rain_threshold_minutes
                .unwrap_or(default_rain_threshold),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Fetch live channel readings for a date range and return the processed series
pub async fn get_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> AppResult<Json<DashboardData>> {
    let request = query.into_request(state.config.alerts.rain_threshold_minutes);
    let service = DashboardService::with_station(
        state.zone,
        StationClient::new(&state.config.station, state.zone),
        TelegramNotifier::from_config(&state.config.telegram),
    );
    let data = service.live_dashboard(&request).await?;
    Ok(Json(data))
}

/// Process operator-uploaded CSV exports through the same pipeline
pub async fn upload_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<DashboardData>> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        let name = field
            .file_name()
            .map(str::to_string)
            .or_else(|| field.name().map(str::to_string))
            .unwrap_or_else(|| format!("upload-{}", files.len() + 1));
        let data = field.bytes().await.map_err(|e| {
            AppError::ValidationError(format!("Failed to read upload '{}': {}", name, e))
        })?;
        files.push((name, data.to_vec()));
    }

    let request = query.into_request(state.config.alerts.rain_threshold_minutes);
    let readings = UploadService::new(state.zone).read_uploads(&files)?;
    let data = DashboardService::new(state.zone).process(&readings, &request)?;
    Ok(Json(data))
}

/// Replay published monthly archive files for past date ranges
pub async fn get_archive_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> AppResult<Json<DashboardData>> {
    let request = query.into_request(state.config.alerts.rain_threshold_minutes);
    let service = DashboardService::with_archive(
        state.zone,
        ArchiveClient::new(&state.config.archive, state.zone),
    );
    let data = service.archive_dashboard(&request).await?;
    Ok(Json(data))
}

/// Download the processed series for a date range as a CSV attachment
pub async fn export_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> AppResult<impl IntoResponse> {
    let request = query.into_request(state.config.alerts.rain_threshold_minutes);
    let service = DashboardService::with_station(
        state.zone,
        StationClient::new(&state.config.station, state.zone),
        None,
    );
    let data = service.live_dashboard(&request).await?;
    let body = ExportService::render(&data.series)?;

    let filename = ExportService::attachment_name(&request.range, request.granularity);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
