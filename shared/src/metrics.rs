//! Derived agronomic metrics: VPD, DLI, and growing degree days
//!
//! Metrics are always computed from already-aggregated sensor values, never
//! averaged themselves: the mean of a nonlinear quantity like VPD over a
//! bucket is not the VPD of the bucket means.

use crate::models::{ProcessedRow, ProcessedSeries, Series};
use crate::types::Granularity;

/// Assumed photoperiod for DLI when the station does not report one (hours).
pub const DEFAULT_LIGHT_HOURS: f64 = 12.0;

/// GDD base temperature used when neither a crop preset nor an explicit
/// override is given (°C).
pub const DEFAULT_BASE_TEMP_C: f64 = 10.0;

/// Saturation vapor pressure at `temp_c` in kPa (Tetens equation).
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    0.6108 * (17.27 * temp_c / (temp_c + 237.3)).exp()
}

/// Vapor pressure deficit in kPa.
///
/// Relative humidity is clamped to `[0, 100]` before use; sensor glitches
/// outside that range must not produce negative or super-saturated VPD.
pub fn vpd(temp_c: f64, humid_pct: f64) -> f64 {
    let humid = humid_pct.clamp(0.0, 100.0);
    let deficit = (1.0 - humid / 100.0) * saturation_vapor_pressure(temp_c);
    deficit.max(0.0)
}

/// Daily light integral in mol·m⁻²·day⁻¹ from mean solar radiation in W·m⁻²
/// over a photoperiod of `light_hours`.
pub fn dli(radn_w_m2: f64, light_hours: f64) -> f64 {
    radn_w_m2 * 3600.0 * light_hours / 1_000_000.0
}

/// Growing-degree-day increment for one day, floored at zero.
pub fn gdd_increment(t_max: f64, t_min: f64, base_temp_c: f64) -> f64 {
    ((t_max + t_min) / 2.0 - base_temp_c).max(0.0)
}

/// Running cumulative GDD over daily mean temperatures, in input order.
///
/// The daily mean stands in for both the maximum and minimum of the day, so
/// the increment reduces to `max(mean - base, 0)`.
pub fn gdd_cumulative(daily_means: &[f64], base_temp_c: f64) -> Vec<f64> {
    let mut acc = 0.0;
    daily_means
        .iter()
        .map(|&mean| {
            acc += gdd_increment(mean, mean, base_temp_c);
            acc
        })
        .collect()
}

/// Attach derived metrics to an aggregated series.
///
/// VPD is computed at every granularity whenever both temperature and
/// humidity are present. DLI and cumulative GDD only make sense per day and
/// are attached at `Day` granularity alone; accumulation starts at the first
/// row of the series, and a day without temperature leaves its GDD cell
/// empty while the running total carries over unchanged.
pub fn derive_metrics(series: &Series, granularity: Granularity, base_temp_c: f64) -> ProcessedSeries {
    let daily = granularity == Granularity::Day;
    let mut acc = 0.0;
    let rows = series
        .rows()
        .iter()
        .map(|reading| {
            let mut row = ProcessedRow::from_reading(reading);
            if let (Some(temp), Some(humid)) = (row.temp, row.humid) {
                row.vpd = Some(vpd(temp, humid));
            }
            if daily {
                if let Some(radn) = row.radn {
                    row.dli = Some(dli(radn, DEFAULT_LIGHT_HOURS));
                }
                if let Some(temp) = row.temp {
                    acc += gdd_increment(temp, temp, base_temp_c);
                    row.gdd = Some(acc);
                }
            }
            row
        })
        .collect();
    ProcessedSeries { granularity, rows }
}
