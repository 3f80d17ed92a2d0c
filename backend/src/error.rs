//! Error handling for the Agricultural Weather Station Platform
//!
//! Provides consistent error responses in Korean and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_ko: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Ingestion errors
    #[error("Schema error: {0}")]
    Schema(#[from] shared::SchemaError),

    // External service errors
    #[error("Telemetry channel unavailable: {0}")]
    StationUnavailable(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    // Export errors
    #[error("CSV export failed: {0}")]
    Export(#[from] shared::ExportError),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ko: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_ko,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_ko: message_ko.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_ko: format!("요청이 올바르지 않습니다: {}", msg),
                    field: None,
                },
            ),
            AppError::Schema(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "SCHEMA_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_ko: "업로드한 CSV의 형식이 올바르지 않습니다".to_string(),
                    field: None,
                },
            ),
            AppError::StationUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STATION_UNAVAILABLE".to_string(),
                    message_en: format!("Telemetry channel is temporarily unavailable: {}", msg),
                    message_ko: "관측소 데이터 채널에 일시적으로 연결할 수 없습니다".to_string(),
                    field: None,
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message_en: format!("External service error: {}", msg),
                    message_ko: format!("외부 서비스 오류가 발생했습니다: {}", msg),
                    field: None,
                },
            ),
            AppError::Export(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "EXPORT_ERROR".to_string(),
                    message_en: format!("CSV export failed: {}", err),
                    message_ko: "CSV 내보내기에 실패했습니다".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
