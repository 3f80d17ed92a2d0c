//! Upload processing for operator-supplied CSV exports

use chrono_tz::Tz;

use shared::{read_rows, Reading, SchemaError, Series};

use crate::error::{AppError, AppResult};

/// Upload service merging operator CSV files into one series
#[derive(Clone)]
pub struct UploadService {
    zone: Tz,
}

impl UploadService {
    /// Create a new UploadService for a station timezone
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Parse and merge uploaded CSV files.
    ///
    /// Files merge in upload order; when two files carry a row for the same
    /// timestamp, the later file's row wins.
    pub fn read_uploads(&self, files: &[(String, Vec<u8>)]) -> AppResult<Series> {
        if files.is_empty() {
            return Err(AppError::ValidationError(
                "No CSV files were uploaded".to_string(),
            ));
        }

        let mut sources: Vec<Vec<Reading>> = Vec::with_capacity(files.len());
        for (name, data) in files {
            let rows = match read_rows(data.as_slice(), self.zone) {
                Ok(rows) => rows,
                Err(SchemaError::MissingTimestamp) => {
                    return Err(AppError::Validation {
                        field: name.clone(),
                        message: format!("'{}' has no timestamp or created_at column", name),
                        message_ko: format!(
                            "'{}' 파일에 timestamp 또는 created_at 열이 없습니다",
                            name
                        ),
                    })
                }
                Err(e) => return Err(AppError::Schema(e)),
            };
            tracing::debug!("Parsed {} rows from upload '{}'", rows.len(), name);
            sources.push(rows);
        }

        Ok(Series::merge(sources))
    }
}
