//! ThingSpeak channel client for live station readings
//!
//! Pulls the feeds CSV for a UTC window and parses it into readings
//! carrying the station's local time.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;

use shared::{read_rows, Reading};

use crate::config::StationConfig;
use crate::error::{AppError, AppResult};

/// ThingSpeak feeds API client
#[derive(Clone)]
pub struct StationClient {
    client: Client,
    base_url: String,
    channel_id: u64,
    read_api_key: String,
    zone: Tz,
}

impl StationClient {
    /// Create a new StationClient from station settings
    pub fn new(config: &StationConfig, zone: Tz) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            channel_id: config.channel_id,
            read_api_key: config.read_api_key.clone(),
            zone,
        }
    }

    /// Create a new StationClient with custom base URL (for testing)
    pub fn with_base_url(config: &StationConfig, zone: Tz, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            channel_id: config.channel_id,
            read_api_key: config.read_api_key.clone(),
            zone,
        }
    }

    /// Fetch channel feed rows between two instants.
    ///
    /// The feeds endpoint takes its window in UTC. Returned rows have their
    /// `created_at` timestamps converted to station time during parsing, so
    /// callers never see raw channel time.
    pub async fn fetch_feed(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Reading>> {
        let mut url = format!(
            "{}/channels/{}/feeds.csv?start={}&end={}",
            self.base_url,
            self.channel_id,
            start.format("%Y-%m-%dT%H:%M:%SZ"),
            end.format("%Y-%m-%dT%H:%M:%SZ"),
        );
        if !self.read_api_key.is_empty() {
            url.push_str("&api_key=");
            url.push_str(&self.read_api_key);
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::StationUnavailable(format!("Feed request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StationUnavailable(format!(
                "Feed API error: {} - {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::StationUnavailable(format!("Failed to read feed response: {}", e))
        })?;

        read_rows(body.as_bytes(), self.zone)
            .map_err(|e| AppError::StationUnavailable(format!("Feed returned malformed CSV: {}", e)))
    }
}
