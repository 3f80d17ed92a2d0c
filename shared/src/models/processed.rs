//! Aggregated rows enriched with derived metrics

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::models::reading::Reading;
use crate::schema::SensorField;
use crate::types::Granularity;

/// One output row of the dashboard pipeline: the aggregated sensor fields
/// plus whichever derived metrics apply at the requested granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessedRow {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dli: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdd: Option<f64>,
}

impl ProcessedRow {
    /// A processed row carrying the sensor fields of `reading` and no
    /// metrics yet.
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            timestamp: reading.timestamp,
            temp: reading.temp,
            humid: reading.humid,
            radn: reading.radn,
            wind: reading.wind,
            rainfall: reading.rainfall,
            battery: reading.battery,
            vpd: None,
            dli: None,
            gdd: None,
        }
    }

    pub fn sensor(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Temp => self.temp,
            SensorField::Humid => self.humid,
            SensorField::Radn => self.radn,
            SensorField::Wind => self.wind,
            SensorField::Rainfall => self.rainfall,
            SensorField::Battery => self.battery,
        }
    }
}

/// Which derived-metric columns actually carry data.
///
/// A metric whose source fields are absent from every row is omitted from
/// exports entirely rather than rendered as an empty column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricColumns {
    pub vpd: bool,
    pub dli: bool,
    pub gdd: bool,
}

/// The pipeline output for one granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedSeries {
    pub granularity: Granularity,
    pub rows: Vec<ProcessedRow>,
}

impl ProcessedSeries {
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            rows: Vec::new(),
        }
    }

    pub fn metric_columns(&self) -> MetricColumns {
        MetricColumns {
            vpd: self.rows.iter().any(|r| r.vpd.is_some()),
            dli: self.rows.iter().any(|r| r.dli.is_some()),
            gdd: self.rows.iter().any(|r| r.gdd.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
