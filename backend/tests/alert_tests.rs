//! Alert detector integration tests
//!
//! Covers the two dashboard alert detectors:
//! - sustained rainfall over consecutive ten-minute buckets
//! - edge-triggered cumulative GDD threshold crossings

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use proptest::prelude::*;

use shared::{
    detect_gdd_crossing, detect_sustained_rain, evaluate_alerts, gdd_stage, sustained_rain_at,
    AlertKind, AlertParams, GddStage, Granularity, ProcessedRow, ProcessedSeries, Reading, Series,
};

fn kst(hour: u32, min: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2023, 10, 1, hour, min, 0)
        .unwrap()
}

/// Ten-minute buckets from 06:00; `None` slots are omitted buckets (gaps).
fn rain_series(pattern: &[Option<f64>]) -> Series {
    let rows = pattern
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            slot.map(|mm| {
                let mut row = Reading::at(kst(6, 0) + Duration::minutes(10 * i as i64));
                row.rainfall = Some(mm);
                row
            })
        })
        .collect();
    Series::from_unsorted(rows)
}

/// A day-granularity processed series carrying the given cumulative curve.
fn gdd_series(cumulative: &[f64]) -> ProcessedSeries {
    let start = kst(0, 0);
    let rows = cumulative
        .iter()
        .enumerate()
        .map(|(i, &gdd)| {
            let mut row = ProcessedRow::from_reading(&Reading::at(start + Duration::days(i as i64)));
            row.gdd = Some(gdd);
            row
        })
        .collect();
    ProcessedSeries {
        granularity: Granularity::Day,
        rows,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Three consecutive wet buckets reach the default 30-minute threshold
    #[test]
    fn test_rain_run_reaching_threshold_fires() {
        let series = rain_series(&[Some(0.2), Some(0.4), Some(0.1)]);
        assert!(detect_sustained_rain(&series, 30));
        // The alert carries the bucket that completed the run.
        assert_eq!(sustained_rain_at(&series, 30), Some(kst(6, 20)));
    }

    /// Two wet buckets fall short of the default threshold
    #[test]
    fn test_short_rain_run_stays_quiet() {
        let series = rain_series(&[Some(0.2), Some(0.4)]);
        assert!(!detect_sustained_rain(&series, 30));
    }

    /// A dry bucket in the middle resets the run
    #[test]
    fn test_zero_rainfall_bucket_resets_run() {
        let series = rain_series(&[Some(0.2), Some(0.4), Some(0.0), Some(0.3), Some(0.1)]);
        assert!(!detect_sustained_rain(&series, 30));
    }

    /// A missing bucket resets the run just like a dry one
    #[test]
    fn test_gap_in_bucket_sequence_resets_run() {
        let series = rain_series(&[Some(0.2), Some(0.4), None, Some(0.3), Some(0.1)]);
        assert!(!detect_sustained_rain(&series, 30));
    }

    /// A lower threshold fires on a single wet bucket
    #[test]
    fn test_ten_minute_threshold_fires_immediately() {
        let series = rain_series(&[Some(0.2)]);
        assert_eq!(sustained_rain_at(&series, 10), Some(kst(6, 0)));
    }

    /// The crossing check looks only at the final step
    #[test]
    fn test_gdd_crossing_is_edge_triggered() {
        // 0.9 × 400 was already behind us, so only harvest-ready fires.
        let crossing = detect_gdd_crossing(&[380.0, 405.0], 400.0);
        assert!(!crossing.pre_warning);
        assert!(crossing.harvest_ready);
    }

    /// One large step can fire both stages at once
    #[test]
    fn test_large_final_step_fires_both_stages() {
        let crossing = detect_gdd_crossing(&[350.0, 405.0], 400.0);
        assert!(crossing.pre_warning);
        assert!(crossing.harvest_ready);
    }

    /// Crossings in history do not refire on later days
    #[test]
    fn test_past_crossings_stay_silent() {
        let crossing = detect_gdd_crossing(&[100.0, 450.0, 460.0], 400.0);
        assert!(!crossing.pre_warning);
        assert!(!crossing.harvest_ready);
    }

    /// Landing exactly on the threshold counts as crossing it
    #[test]
    fn test_exact_threshold_value_counts() {
        let crossing = detect_gdd_crossing(&[399.0, 400.0], 400.0);
        assert!(crossing.harvest_ready);
    }

    /// A single point offers no edge to examine
    #[test]
    fn test_single_point_cannot_cross() {
        let crossing = detect_gdd_crossing(&[500.0], 400.0);
        assert!(!crossing.pre_warning && !crossing.harvest_ready);
    }

    /// Maturity stage follows the latest cumulative value
    #[test]
    fn test_gdd_stage_classification() {
        assert_eq!(gdd_stage(100.0, 400.0), GddStage::Growing);
        assert_eq!(gdd_stage(365.0, 400.0), GddStage::PreWarned);
        assert_eq!(gdd_stage(400.0, 400.0), GddStage::HarvestReady);
    }

    /// The evaluator combines rain and GDD events in one pass
    #[test]
    fn test_evaluate_combines_both_detectors() {
        let rain = rain_series(&[Some(0.2), Some(0.4), Some(0.1)]);
        let daily = gdd_series(&[350.0, 405.0]);
        let params = AlertParams {
            rain_threshold_minutes: 30,
            gdd_threshold: Some(400.0),
            crop: None,
        };

        let events = evaluate_alerts(&rain, Some(&daily), &params);
        let kinds: Vec<AlertKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::RainSustained,
                AlertKind::GddPreWarning,
                AlertKind::GddHarvestReady,
            ]
        );
    }

    /// Without a daily series, GDD alerting is skipped
    #[test]
    fn test_no_daily_series_means_no_gdd_events() {
        let rain = rain_series(&[Some(0.2), Some(0.4), Some(0.1)]);
        let params = AlertParams {
            rain_threshold_minutes: 30,
            gdd_threshold: Some(400.0),
            crop: None,
        };

        let events = evaluate_alerts(&rain, None, &params);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AlertKind::RainSustained);
    }

    /// An unset harvest target disables GDD alerting entirely
    #[test]
    fn test_threshold_none_disables_gdd_alerts() {
        let daily = gdd_series(&[350.0, 405.0]);
        let events = evaluate_alerts(&Series::empty(), Some(&daily), &AlertParams::default());
        assert!(events.is_empty());
    }

    /// The rain alert text reports the configured duration bilingually
    #[test]
    fn test_rain_alert_message_carries_duration() {
        let series = rain_series(&[Some(0.2), Some(0.3), Some(0.4)]);
        let events = evaluate_alerts(&series, None, &AlertParams::default());

        assert_eq!(events.len(), 1);
        assert!(events[0].message.contains("30 minutes"));
        assert!(events[0].message_ko.contains("30분"));
        assert_eq!(events[0].triggered_at, kst(6, 20));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Reference computation: longest run of consecutive wet buckets.
    /// Both a dry bucket and a missing bucket break the run.
    fn longest_wet_run(pattern: &[Option<f64>]) -> u32 {
        let mut best = 0u32;
        let mut run = 0u32;
        for slot in pattern {
            match slot {
                Some(mm) if *mm > 0.0 => {
                    run += 1;
                    best = best.max(run);
                }
                _ => run = 0,
            }
        }
        best
    }

    fn bucket_pattern() -> impl Strategy<Value = Vec<Option<f64>>> {
        prop::collection::vec(
            prop_oneof![
                Just(None),
                Just(Some(0.0)),
                (0.1f64..5.0).prop_map(Some),
            ],
            0..48,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Detection agrees with a direct longest-run computation
        #[test]
        fn prop_rain_detection_matches_longest_run(
            pattern in bucket_pattern(),
            threshold_buckets in 1u32..6,
        ) {
            let series = rain_series(&pattern);
            let expected = longest_wet_run(&pattern) >= threshold_buckets;
            prop_assert_eq!(
                detect_sustained_rain(&series, threshold_buckets * 10),
                expected
            );
        }

        /// An explicit dry bucket and a missing bucket reset identically
        #[test]
        fn prop_gap_and_zero_reset_equally(prefix in 1u32..4, suffix in 1u32..4) {
            let wet = |n: u32| std::iter::repeat(Some(0.5)).take(n as usize);
            let with_gap: Vec<Option<f64>> =
                wet(prefix).chain([None]).chain(wet(suffix)).collect();
            let with_zero: Vec<Option<f64>> =
                wet(prefix).chain([Some(0.0)]).chain(wet(suffix)).collect();

            for threshold in [10u32, 20, 30, 40, 50] {
                prop_assert_eq!(
                    detect_sustained_rain(&rain_series(&with_gap), threshold),
                    detect_sustained_rain(&rain_series(&with_zero), threshold)
                );
            }
        }

        /// History ahead of the final pair never affects the crossing
        #[test]
        fn prop_crossing_depends_only_on_final_pair(
            prefix in prop::collection::vec(0.0f64..1000.0, 0..20),
            prev in 0.0f64..1000.0,
            last in 0.0f64..1000.0,
            threshold in 100.0f64..900.0,
        ) {
            let mut long = prefix.clone();
            long.push(prev);
            long.push(last);
            prop_assert_eq!(
                detect_gdd_crossing(&long, threshold),
                detect_gdd_crossing(&[prev, last], threshold)
            );
        }

        /// The pre-warning mark sits at 90% of the configured target
        #[test]
        fn prop_pre_warning_mark_at_ninety_percent(
            threshold in 100.0f64..900.0,
            below in 0.01f64..0.99,
            above in 0.0f64..0.1,
        ) {
            let pre_mark = 0.9 * threshold;
            let prev = pre_mark * below;
            let last = pre_mark * (1.0 + above);
            let crossing = detect_gdd_crossing(&[prev, last], threshold);
            prop_assert!(crossing.pre_warning);
        }

        /// Stage classification is consistent with the thresholds
        #[test]
        fn prop_stage_matches_thresholds(
            gdd in 0.0f64..1000.0,
            threshold in 100.0f64..900.0,
        ) {
            match gdd_stage(gdd, threshold) {
                GddStage::HarvestReady => prop_assert!(gdd >= threshold),
                GddStage::PreWarned => {
                    prop_assert!(gdd >= 0.9 * threshold && gdd < threshold)
                }
                GddStage::Growing => prop_assert!(gdd < 0.9 * threshold),
            }
        }
    }
}
