//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Time-bucket width used when resampling a series.
///
/// `Raw` is the degenerate "no aggregation" level; the other levels are
/// fixed-width, left-closed buckets aligned to the station-local clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    #[serde(rename = "raw")]
    Raw,
    #[serde(rename = "10min")]
    TenMin,
    #[serde(rename = "1hour")]
    Hour,
    #[serde(rename = "1day")]
    Day,
}

impl Granularity {
    /// Bucket width in seconds, or `None` for the raw level.
    pub fn bucket_seconds(&self) -> Option<i64> {
        match self {
            Granularity::Raw => None,
            Granularity::TenMin => Some(600),
            Granularity::Hour => Some(3_600),
            Granularity::Day => Some(86_400),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Raw => "raw",
            Granularity::TenMin => "10min",
            Granularity::Hour => "1hour",
            Granularity::Day => "1day",
        }
    }
}

/// Date range for queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
