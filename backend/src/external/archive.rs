//! Archive client for published monthly CSV exports
//!
//! The station publishes one CSV per calendar month named `{year}_{month}.csv`.
//! Months that have not been published yet simply do not exist at the archive
//! URL, so a missing file is not an error.

use chrono::Datelike;
use chrono_tz::Tz;
use reqwest::Client;

use shared::{read_rows, DateRange, Reading};

use crate::config::ArchiveConfig;
use crate::error::{AppError, AppResult};

/// Monthly archive file client
#[derive(Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
    zone: Tz,
}

impl ArchiveClient {
    /// Create a new ArchiveClient from archive settings
    pub fn new(config: &ArchiveConfig, zone: Tz) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            zone,
        }
    }

    /// Create a new ArchiveClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String, zone: Tz) -> Self {
        Self {
            client: Client::new(),
            base_url,
            zone,
        }
    }

    /// Fetch one month's file; `Ok(None)` when the month is not published.
    pub async fn fetch_month(&self, year: i32, month: u32) -> AppResult<Option<Vec<Reading>>> {
        let url = format!("{}/{}_{:02}.csv", self.base_url, year, month);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Archive request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Archive error: {} - {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to read archive response: {}", e))
        })?;

        let rows = read_rows(body.as_bytes(), self.zone).map_err(|e| {
            AppError::ExternalService(format!("Archive file {}_{:02}.csv is malformed: {}", year, month, e))
        })?;
        Ok(Some(rows))
    }

    /// Fetch every published month the date range touches, concatenated in
    /// chronological file order. Unpublished months are logged and skipped.
    pub async fn fetch_range(&self, range: &DateRange) -> AppResult<Vec<Reading>> {
        let mut rows = Vec::new();
        for (year, month) in months_of(range) {
            match self.fetch_month(year, month).await? {
                Some(mut month_rows) => rows.append(&mut month_rows),
                None => {
                    tracing::warn!("Archive file {}_{:02}.csv not published, skipping", year, month);
                }
            }
        }
        Ok(rows)
    }
}

/// Year-month pairs the range touches, inclusive on both ends.
fn months_of(range: &DateRange) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (range.start.year(), range.start.month());
    let last = (range.end.year(), range.end.month());
    while (year, month) <= last {
        months.push((year, month));
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    months
}
