//! Dashboard service running the reading pipeline
//!
//! One pipeline pass sits behind every readings endpoint: restrict to the
//! requested date range, aggregate, derive metrics, evaluate alerts. The
//! live and archive variants prepend a fetch step; uploads and exports run
//! the same pass over readings the caller already has.

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use shared::{
    aggregate, derive_metrics, evaluate_alerts, preset_for, validate_base_temp,
    validate_date_range, validate_gdd_threshold, validate_rain_threshold_minutes, AlertEvent,
    AlertParams, CropKind, DateRange, Granularity, MetricColumns, ProcessedSeries, Series,
    DEFAULT_BASE_TEMP_C,
};

use crate::error::{AppError, AppResult};
use crate::external::{ArchiveClient, StationClient, TelegramNotifier};

/// Parameters for one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct PipelineRequest {
    pub range: DateRange,
    pub granularity: Granularity,
    pub crop: Option<CropKind>,
    pub base_temp: Option<f64>,
    pub gdd_threshold: Option<f64>,
    pub rain_threshold_minutes: u32,
}

impl PipelineRequest {
    /// Base temperature for GDD accumulation. A crop preset pins it; the
    /// explicit override applies only without a crop, and the engine default
    /// covers the rest.
    pub fn effective_base_temp(&self) -> f64 {
        if let Some(crop) = self.crop {
            return preset_for(crop).base_temp_c;
        }
        self.base_temp.unwrap_or(DEFAULT_BASE_TEMP_C)
    }

    /// Harvest GDD target: an explicit threshold wins over the crop default.
    pub fn effective_gdd_threshold(&self) -> Option<f64> {
        self.gdd_threshold
            .or_else(|| self.crop.map(|crop| preset_for(crop).default_gdd_threshold))
    }
}

/// Degraded-data notice attached to a dashboard response
#[derive(Debug, Clone, Serialize)]
pub struct Advisory {
    pub message: String,
    pub message_ko: String,
}

impl Advisory {
    /// Notice that the live feed could not be reached for this request
    pub fn station_unavailable() -> Self {
        Self {
            message: "Live station data could not be fetched; readings for this range may be \
                      missing or incomplete."
                .to_string(),
            message_ko: "관측소 실시간 데이터를 가져오지 못했습니다. 조회 결과가 비어 있거나 \
                         일부만 표시될 수 있습니다."
                .to_string(),
        }
    }
}

/// Everything one dashboard view needs for a date range
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub series: ProcessedSeries,
    pub metric_columns: MetricColumns,
    pub alerts: Vec<AlertEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}

/// Dashboard service orchestrating fetch, aggregation, metrics and alerts
#[derive(Clone)]
pub struct DashboardService {
    zone: Tz,
    station: Option<StationClient>,
    archive: Option<ArchiveClient>,
    notifier: Option<TelegramNotifier>,
}

impl DashboardService {
    /// Create a processing-only service with no external clients
    pub fn new(zone: Tz) -> Self {
        Self {
            zone,
            station: None,
            archive: None,
            notifier: None,
        }
    }

    /// Create a service that pulls live readings from the station channel
    pub fn with_station(
        zone: Tz,
        station: StationClient,
        notifier: Option<TelegramNotifier>,
    ) -> Self {
        Self {
            zone,
            station: Some(station),
            archive: None,
            notifier,
        }
    }

    /// Create a service that replays published archive months
    pub fn with_archive(zone: Tz, archive: ArchiveClient) -> Self {
        Self {
            zone,
            station: None,
            archive: Some(archive),
            notifier: None,
        }
    }

    /// Run the pipeline over readings the caller supplies
    pub fn process(&self, readings: &Series, request: &PipelineRequest) -> AppResult<DashboardData> {
        validate_request(request)?;
        Ok(self.run_pipeline(readings, request))
    }

    /// Fetch the live feed for the range, then run the pipeline.
    ///
    /// A failed fetch degrades to an empty dashboard carrying an advisory
    /// instead of an error, so the endpoint stays usable while the channel
    /// is down.
    pub async fn live_dashboard(&self, request: &PipelineRequest) -> AppResult<DashboardData> {
        validate_request(request)?;
        let (readings, advisory) = self.load_station_range(&request.range).await;
        let mut data = self.run_pipeline(&readings, request);
        data.advisory = advisory;
        self.notify_alerts(&data.alerts).await;
        Ok(data)
    }

    /// Replay published archive months covering the range, then run the
    /// pipeline. Unpublished months are skipped; a network failure is a
    /// hard error, unlike the live path.
    pub async fn archive_dashboard(&self, request: &PipelineRequest) -> AppResult<DashboardData> {
        validate_request(request)?;
        let archive = match &self.archive {
            Some(client) => client,
            None => {
                return Err(AppError::ExternalService(
                    "Archive client not configured".to_string(),
                ))
            }
        };
        let rows = archive.fetch_range(&request.range).await?;
        Ok(self.run_pipeline(&Series::from_unsorted(rows), request))
    }

    /// Push alert messages to the configured chat. Delivery failures are
    /// logged and swallowed so they never fail the request that raised them.
    pub async fn notify_alerts(&self, alerts: &[AlertEvent]) {
        let notifier = match &self.notifier {
            Some(n) => n,
            None => return,
        };
        for event in alerts {
            if let Err(e) = notifier.send_message(&event.message_ko).await {
                tracing::warn!("Failed to deliver {:?} alert: {}", event.kind, e);
            }
        }
    }

    fn run_pipeline(&self, readings: &Series, request: &PipelineRequest) -> DashboardData {
        let filtered = readings.select_range(&request.range);
        let aggregated = aggregate(&filtered, request.granularity);
        let processed = derive_metrics(
            &aggregated,
            request.granularity,
            request.effective_base_temp(),
        );

        // The rain detector always works on ten-minute buckets, whatever
        // granularity the view asked for.
        let ten_minute = if request.granularity == Granularity::TenMin {
            aggregated
        } else {
            aggregate(&filtered, Granularity::TenMin)
        };
        let daily = if request.granularity == Granularity::Day {
            Some(&processed)
        } else {
            None
        };
        let params = AlertParams {
            rain_threshold_minutes: request.rain_threshold_minutes,
            gdd_threshold: request.effective_gdd_threshold(),
            crop: request.crop,
        };
        let alerts = evaluate_alerts(&ten_minute, daily, &params);

        DashboardData {
            metric_columns: processed.metric_columns(),
            series: processed,
            alerts,
            advisory: None,
        }
    }

    async fn load_station_range(&self, range: &DateRange) -> (Series, Option<Advisory>) {
        let station = match &self.station {
            Some(client) => client,
            None => return (Series::empty(), Some(Advisory::station_unavailable())),
        };
        let start = local_midnight_utc(self.zone, range.start);
        let end = local_midnight_utc(self.zone, range.end.succ_opt().unwrap_or(range.end));
        match station.fetch_feed(start, end).await {
            Ok(rows) => (Series::from_unsorted(rows), None),
            Err(e) => {
                tracing::warn!("Station feed unavailable: {:?}", e);
                (Series::empty(), Some(Advisory::station_unavailable()))
            }
        }
    }
}

fn validate_request(request: &PipelineRequest) -> AppResult<()> {
    if let Err(message) = validate_date_range(&request.range) {
        return Err(AppError::Validation {
            field: "end_date".to_string(),
            message: message.to_string(),
            message_ko: "조회 시작일은 종료일보다 늦을 수 없습니다".to_string(),
        });
    }
    if let Some(base_temp) = request.base_temp {
        if let Err(message) = validate_base_temp(base_temp) {
            return Err(AppError::Validation {
                field: "base_temp".to_string(),
                message: message.to_string(),
                message_ko: "기준 온도가 허용 범위를 벗어났습니다".to_string(),
            });
        }
    }
    if let Some(threshold) = request.gdd_threshold {
        if let Err(message) = validate_gdd_threshold(threshold) {
            return Err(AppError::Validation {
                field: "gdd_threshold".to_string(),
                message: message.to_string(),
                message_ko: "GDD 목표값은 0보다 큰 수여야 합니다".to_string(),
            });
        }
    }
    if let Err(message) = validate_rain_threshold_minutes(request.rain_threshold_minutes) {
        return Err(AppError::Validation {
            field: "rain_threshold_minutes".to_string(),
            message: message.to_string(),
            message_ko: "강우 경보 기준(분)이 허용 범위를 벗어났습니다".to_string(),
        });
    }
    Ok(())
}

/// UTC instant of local midnight on `date` in `zone`. A midnight erased by a
/// DST transition resolves to the first valid instant after it.
fn local_midnight_utc(zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    let mut naive = date.and_time(NaiveTime::MIN);
    for _ in 0..4 {
        match zone.from_local_datetime(&naive) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => {
                return t.with_timezone(&Utc)
            }
            LocalResult::None => naive += Duration::hours(1),
        }
    }
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
