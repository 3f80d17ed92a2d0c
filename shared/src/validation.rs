//! Validation utilities for the Agricultural Weather Station Platform
//!
//! Request parameters are validated here before the pipeline runs; sensor
//! values themselves are never rejected, only clamped or skipped downstream.

use crate::types::DateRange;

// ============================================================================
// Request Parameter Validations
// ============================================================================

/// Validate a selection range is well-formed (closed range, start <= end)
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.start > range.end {
        return Err("Start date must not be after end date");
    }
    Ok(())
}

/// Validate a GDD base temperature is physically plausible (°C)
pub fn validate_base_temp(base_temp_c: f64) -> Result<(), &'static str> {
    if !base_temp_c.is_finite() {
        return Err("Base temperature must be a finite number");
    }
    if !(-50.0..=50.0).contains(&base_temp_c) {
        return Err("Base temperature must be between -50 and 50 °C");
    }
    Ok(())
}

/// Validate a cumulative GDD harvest threshold
pub fn validate_gdd_threshold(threshold: f64) -> Result<(), &'static str> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err("GDD threshold must be a positive number");
    }
    Ok(())
}

/// Validate a sustained-rain threshold in minutes
pub fn validate_rain_threshold_minutes(minutes: u32) -> Result<(), &'static str> {
    if minutes == 0 {
        return Err("Rain threshold must be at least 1 minute");
    }
    if minutes > 1440 {
        return Err("Rain threshold must be at most 1440 minutes");
    }
    Ok(())
}
