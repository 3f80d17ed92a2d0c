//! Threshold alert evaluation over processed series
//!
//! Two independent detectors run per evaluation pass: sustained rainfall
//! over ten-minute buckets, and growing-degree-day threshold crossings over
//! the daily cumulative curve. Both are stateless per call; re-arming across
//! seasons is the caller's concern.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::models::{preset_for, AlertEvent, CropKind, ProcessedSeries, Series};
use crate::types::Granularity;

/// Fraction of the harvest threshold at which the pre-warning fires.
pub const PRE_WARNING_FRACTION: f64 = 0.9;

/// Width of the rain-detection bucket in minutes.
const RAIN_BUCKET_MINUTES: i64 = 10;

/// Tunables for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertParams {
    /// Minimum continuous rainfall duration that raises an alert.
    pub rain_threshold_minutes: u32,
    /// Harvest-ready cumulative GDD; `None` disables GDD alerting.
    pub gdd_threshold: Option<f64>,
    /// Crop the GDD target belongs to; names it in alert text when set.
    pub crop: Option<CropKind>,
}

impl Default for AlertParams {
    fn default() -> Self {
        Self {
            rain_threshold_minutes: 30,
            gdd_threshold: None,
            crop: None,
        }
    }
}

/// The timestamp of the bucket that completes a qualifying rain run, if any.
///
/// Expects ten-minute aggregated input. A run counts consecutive buckets
/// with non-zero rainfall; a zero bucket resets it, and so does a gap in the
/// bucket sequence, since omitted buckets carry no evidence of rain.
pub fn sustained_rain_at(
    ten_minute: &Series,
    threshold_minutes: u32,
) -> Option<DateTime<FixedOffset>> {
    let mut run: u32 = 0;
    let mut prev: Option<DateTime<FixedOffset>> = None;
    for row in ten_minute.rows() {
        let contiguous = prev
            .map(|p| (row.timestamp - p).num_minutes() == RAIN_BUCKET_MINUTES)
            .unwrap_or(true);
        let wet = row.rainfall.map(|mm| mm > 0.0).unwrap_or(false);
        run = match (wet, contiguous) {
            (true, true) => run + 1,
            (true, false) => 1,
            (false, _) => 0,
        };
        if run > 0 && u64::from(run) * RAIN_BUCKET_MINUTES as u64 >= u64::from(threshold_minutes) {
            return Some(row.timestamp);
        }
        prev = Some(row.timestamp);
    }
    None
}

/// Whether any rain run in the series meets the threshold.
pub fn detect_sustained_rain(ten_minute: &Series, threshold_minutes: u32) -> bool {
    sustained_rain_at(ten_minute, threshold_minutes).is_some()
}

/// Outcome of one edge-triggered GDD check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GddCrossing {
    pub pre_warning: bool,
    pub harvest_ready: bool,
}

/// Edge-triggered threshold check over the final adjacent pair of the
/// cumulative GDD curve.
///
/// `pre_warning` fires when the last step crosses `0.9 × threshold` from
/// below; `harvest_ready` fires analogously at the threshold itself. A large
/// final step may fire both at once. Fewer than two points means no edge to
/// examine, so nothing fires; callers evaluating daily must invoke this once
/// per new day.
pub fn detect_gdd_crossing(cumulative: &[f64], threshold: f64) -> GddCrossing {
    if cumulative.len() < 2 {
        return GddCrossing::default();
    }
    let prev = cumulative[cumulative.len() - 2];
    let last = cumulative[cumulative.len() - 1];
    let pre_mark = PRE_WARNING_FRACTION * threshold;
    GddCrossing {
        pre_warning: prev < pre_mark && last >= pre_mark,
        harvest_ready: prev < threshold && last >= threshold,
    }
}

/// Maturity stage implied by the latest cumulative GDD value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GddStage {
    Growing,
    PreWarned,
    HarvestReady,
}

pub fn gdd_stage(cumulative_gdd: f64, threshold: f64) -> GddStage {
    if cumulative_gdd >= threshold {
        GddStage::HarvestReady
    } else if cumulative_gdd >= PRE_WARNING_FRACTION * threshold {
        GddStage::PreWarned
    } else {
        GddStage::Growing
    }
}

/// Run both detectors and collect the alert events for this pass.
///
/// `daily` is the day-granularity processed series when the request produced
/// one; without it (or without a threshold) GDD alerting is skipped. Rain
/// events carry the timestamp of the bucket completing the run; GDD events
/// carry the timestamp of the last daily row.
pub fn evaluate_alerts(
    ten_minute: &Series,
    daily: Option<&ProcessedSeries>,
    params: &AlertParams,
) -> Vec<AlertEvent> {
    let mut events = Vec::new();

    if let Some(triggered_at) = sustained_rain_at(ten_minute, params.rain_threshold_minutes) {
        events.push(AlertEvent::rain_sustained(
            params.rain_threshold_minutes,
            triggered_at,
        ));
    }

    if let (Some(daily), Some(threshold)) = (daily, params.gdd_threshold) {
        if daily.granularity == Granularity::Day {
            let crop = params.crop.map(preset_for);
            let curve: Vec<f64> = daily.rows.iter().filter_map(|r| r.gdd).collect();
            let crossing = detect_gdd_crossing(&curve, threshold);
            if let Some(last) = daily.rows.last() {
                if crossing.pre_warning {
                    events.push(AlertEvent::gdd_pre_warning(crop, threshold, last.timestamp));
                }
                if crossing.harvest_ready {
                    events.push(AlertEvent::gdd_harvest_ready(crop, threshold, last.timestamp));
                }
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, Reading};
    use chrono::TimeZone;

    fn rain_series(buckets: &[f64]) -> Series {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let start = kst.with_ymd_and_hms(2023, 10, 1, 6, 0, 0).unwrap();
        let rows = buckets
            .iter()
            .enumerate()
            .map(|(i, &mm)| {
                let mut row = Reading::at(start + chrono::Duration::minutes(10 * i as i64));
                row.rainfall = Some(mm);
                row
            })
            .collect();
        Series::from_unsorted(rows)
    }

    // ========================================================================
    // Rain Detector Tests
    // ========================================================================

    #[test]
    fn test_four_consecutive_wet_buckets_meet_30_minutes() {
        assert!(detect_sustained_rain(
            &rain_series(&[1.0, 1.0, 1.0, 1.0, 0.0, 1.0]),
            30
        ));
    }

    #[test]
    fn test_interrupted_rain_does_not_accumulate() {
        assert!(!detect_sustained_rain(
            &rain_series(&[1.0, 0.0, 1.0, 0.0, 1.0]),
            30
        ));
    }

    #[test]
    fn test_trigger_timestamp_is_run_completing_bucket() {
        let series = rain_series(&[0.0, 1.0, 1.0, 1.0, 1.0]);
        let at = sustained_rain_at(&series, 30).unwrap();
        // Run starts at the second bucket (06:10); the third wet bucket
        // (06:30) brings it to 30 minutes.
        assert_eq!(at, series.rows()[3].timestamp);
    }

    #[test]
    fn test_gap_in_buckets_resets_run() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let start = kst.with_ymd_and_hms(2023, 10, 1, 6, 0, 0).unwrap();
        let mut rows = Vec::new();
        for minutes in [0i64, 10, 40, 50] {
            let mut row = Reading::at(start + chrono::Duration::minutes(minutes));
            row.rainfall = Some(1.0);
            rows.push(row);
        }
        // Two wet pairs separated by a 30-minute hole: no run reaches 30 min.
        assert!(!detect_sustained_rain(&Series::from_unsorted(rows), 30));
    }

    #[test]
    fn test_missing_rainfall_field_resets_run() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let start = kst.with_ymd_and_hms(2023, 10, 1, 6, 0, 0).unwrap();
        let mut rows = Vec::new();
        for (i, mm) in [Some(1.0), Some(1.0), None, Some(1.0), Some(1.0)]
            .into_iter()
            .enumerate()
        {
            let mut row = Reading::at(start + chrono::Duration::minutes(10 * i as i64));
            row.rainfall = mm;
            rows.push(row);
        }
        assert!(!detect_sustained_rain(&Series::from_unsorted(rows), 30));
    }

    #[test]
    fn test_empty_series_never_detects_rain() {
        assert!(!detect_sustained_rain(&Series::empty(), 30));
    }

    // ========================================================================
    // GDD Crossing Tests
    // ========================================================================

    #[test]
    fn test_pre_warning_fires_on_crossing_pair_only() {
        // Threshold 400 puts the pre-warning mark at 360.
        assert_eq!(
            detect_gdd_crossing(&[350.0, 362.0], 400.0),
            GddCrossing {
                pre_warning: true,
                harvest_ready: false
            }
        );
        // The next day's pair is already past the mark: no re-fire.
        assert_eq!(
            detect_gdd_crossing(&[362.0, 395.0], 400.0),
            GddCrossing::default()
        );
    }

    #[test]
    fn test_full_curve_checks_final_pair_only() {
        // [350, 362, 395]: the final pair (362, 395) crosses nothing.
        assert_eq!(
            detect_gdd_crossing(&[350.0, 362.0, 395.0], 400.0),
            GddCrossing::default()
        );
    }

    #[test]
    fn test_harvest_ready_fires_at_threshold() {
        let crossing = detect_gdd_crossing(&[395.0, 401.0], 400.0);
        assert!(!crossing.pre_warning);
        assert!(crossing.harvest_ready);
    }

    #[test]
    fn test_large_step_fires_both() {
        let crossing = detect_gdd_crossing(&[350.0, 405.0], 400.0);
        assert!(crossing.pre_warning);
        assert!(crossing.harvest_ready);
    }

    #[test]
    fn test_fewer_than_two_points_never_fires() {
        assert_eq!(detect_gdd_crossing(&[], 400.0), GddCrossing::default());
        assert_eq!(detect_gdd_crossing(&[500.0], 400.0), GddCrossing::default());
    }

    #[test]
    fn test_gdd_stage_ordering() {
        assert_eq!(gdd_stage(100.0, 400.0), GddStage::Growing);
        assert_eq!(gdd_stage(360.0, 400.0), GddStage::PreWarned);
        assert_eq!(gdd_stage(400.0, 400.0), GddStage::HarvestReady);
    }

    // ========================================================================
    // Evaluation Pass Tests
    // ========================================================================

    #[test]
    fn test_evaluate_collects_rain_event() {
        let events = evaluate_alerts(
            &rain_series(&[1.0, 1.0, 1.0]),
            None,
            &AlertParams::default(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AlertKind::RainSustained);
        assert!(events[0].message.contains("30 minutes"));
    }

    #[test]
    fn test_evaluate_fires_gdd_events_named_after_crop() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let rows: Vec<crate::models::ProcessedRow> = [350.0, 405.0]
            .iter()
            .enumerate()
            .map(|(i, &gdd)| {
                let reading = Reading::at(
                    kst.with_ymd_and_hms(2023, 10, 1 + i as u32, 0, 0, 0).unwrap(),
                );
                let mut row = crate::models::ProcessedRow::from_reading(&reading);
                row.gdd = Some(gdd);
                row
            })
            .collect();
        let daily = ProcessedSeries {
            granularity: Granularity::Day,
            rows,
        };
        let params = AlertParams {
            rain_threshold_minutes: 30,
            gdd_threshold: Some(400.0),
            crop: Some(crate::models::CropKind::BokChoy),
        };

        let events = evaluate_alerts(&Series::empty(), Some(&daily), &params);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, AlertKind::GddPreWarning);
        assert_eq!(events[1].kind, AlertKind::GddHarvestReady);
        assert!(events[1].message_ko.contains("청경채"));
        assert_eq!(events[1].triggered_at, daily.rows[1].timestamp);
    }

    #[test]
    fn test_evaluate_skips_gdd_below_day_granularity() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let reading = Reading::at(kst.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap());
        let mut row = crate::models::ProcessedRow::from_reading(&reading);
        row.gdd = Some(405.0);
        let hourly = ProcessedSeries {
            granularity: Granularity::Hour,
            rows: vec![row],
        };
        let params = AlertParams {
            gdd_threshold: Some(400.0),
            ..AlertParams::default()
        };
        assert!(evaluate_alerts(&Series::empty(), Some(&hourly), &params).is_empty());
    }

    #[test]
    fn test_evaluate_empty_inputs_yield_no_events() {
        let events = evaluate_alerts(&Series::empty(), None, &AlertParams::default());
        assert!(events.is_empty());
    }
}
