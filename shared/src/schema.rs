//! Column-schema resolution and timestamp normalization
//!
//! Raw sources name their columns inconsistently: the telemetry channel uses
//! the vendor index scheme (`created_at`, `field1`..`field6`) while uploaded
//! CSV files carry canonical names in arbitrary case with stray whitespace.
//! Everything funnels through this module into one canonical schema.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Errors raised while resolving a raw source against the canonical schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no timestamp column found (expected 'timestamp' or 'created_at')")]
    MissingTimestamp,

    #[error("unknown station timezone '{0}'")]
    UnknownTimezone(String),

    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// The six canonical sensor fields of a station reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorField {
    Temp,
    Humid,
    Radn,
    Wind,
    Rainfall,
    Battery,
}

impl SensorField {
    pub const ALL: [SensorField; 6] = [
        SensorField::Temp,
        SensorField::Humid,
        SensorField::Radn,
        SensorField::Wind,
        SensorField::Rainfall,
        SensorField::Battery,
    ];

    /// Canonical column name as it appears in uploads and exports.
    pub fn name(&self) -> &'static str {
        match self {
            SensorField::Temp => "temp",
            SensorField::Humid => "humid",
            SensorField::Radn => "radn",
            SensorField::Wind => "wind",
            SensorField::Rainfall => "rainfall",
            SensorField::Battery => "battery",
        }
    }

    /// Resolve a raw header against the canonical schema.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Accepts both canonical names and the vendor index scheme
    /// (`field1` = temp .. `field6` = battery). Unknown headers resolve
    /// to `None` and are ignored by the reader.
    pub fn resolve(header: &str) -> Option<SensorField> {
        match header.trim().to_ascii_lowercase().as_str() {
            "temp" | "field1" => Some(SensorField::Temp),
            "humid" | "field2" => Some(SensorField::Humid),
            "radn" | "field3" => Some(SensorField::Radn),
            "wind" | "field4" => Some(SensorField::Wind),
            "rainfall" | "field5" => Some(SensorField::Rainfall),
            "battery" | "field6" => Some(SensorField::Battery),
            _ => None,
        }
    }
}

/// Whether a raw header names the timestamp column.
///
/// Uploaded files use `timestamp`; the telemetry feed uses `created_at`.
pub fn is_timestamp_header(header: &str) -> bool {
    let normalized = header.trim().to_ascii_lowercase();
    normalized == "timestamp" || normalized == "created_at"
}

/// Resolve an IANA zone name (e.g. `Asia/Seoul`) to a timezone.
pub fn station_zone(name: &str) -> Result<Tz, SchemaError> {
    name.parse::<Tz>()
        .map_err(|_| SchemaError::UnknownTimezone(name.to_string()))
}

/// Re-express a UTC instant in the station-local zone.
pub fn to_station_time(instant: DateTime<Utc>, zone: Tz) -> DateTime<FixedOffset> {
    instant.with_timezone(&zone).fixed_offset()
}

/// Parse a raw timestamp cell and normalize it to the station zone.
///
/// Zone-aware inputs are converted directly; zoneless inputs are assumed to
/// be UTC first. Either way the result names the same instant, so feeding an
/// already-normalized timestamp back through is a no-op (no double shift).
/// Returns `None` for cells no known source produces.
pub fn parse_timestamp(raw: &str, zone: Tz) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    // RFC 3339 / ISO 8601 with an explicit offset.
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(to_station_time(aware.with_timezone(&Utc), zone));
    }

    // The telemetry feed spells UTC out ("2023-10-01 00:00:00 UTC").
    let naive_part = raw.strip_suffix("UTC").map(str::trim).unwrap_or(raw);
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, format) {
            return Some(to_station_time(Utc.from_utc_datetime(&naive), zone));
        }
    }

    None
}
