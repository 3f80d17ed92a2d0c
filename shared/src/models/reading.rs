//! Canonical station readings and time-ordered series

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::schema::SensorField;
use crate::types::DateRange;

/// A single timestamped observation in the canonical schema.
///
/// Every sensor field is optional: sources routinely omit columns, and a
/// missing value must never be confused with a physical zero (rainfall and
/// night-time radiation are legitimately `0.0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
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
}

impl Reading {
    /// An empty reading at the given instant.
    pub fn at(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            temp: None,
            humid: None,
            radn: None,
            wind: None,
            rainfall: None,
            battery: None,
        }
    }

    pub fn get(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Temp => self.temp,
            SensorField::Humid => self.humid,
            SensorField::Radn => self.radn,
            SensorField::Wind => self.wind,
            SensorField::Rainfall => self.rainfall,
            SensorField::Battery => self.battery,
        }
    }

    pub fn set(&mut self, field: SensorField, value: f64) {
        let slot = match field {
            SensorField::Temp => &mut self.temp,
            SensorField::Humid => &mut self.humid,
            SensorField::Radn => &mut self.radn,
            SensorField::Wind => &mut self.wind,
            SensorField::Rainfall => &mut self.rainfall,
            SensorField::Battery => &mut self.battery,
        };
        *slot = Some(value);
    }
}

/// A time-ordered sequence of readings with unique, strictly increasing
/// timestamps.
///
/// An empty series is a first-class value meaning "no data"; every pipeline
/// stage accepts and produces it without error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    rows: Vec<Reading>,
}

impl Series {
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Build a series from rows in arbitrary order.
    ///
    /// Rows are stably sorted by timestamp; rows sharing a timestamp are
    /// collapsed last-write-wins, so when merged sources disagree the row
    /// supplied latest in input order is kept.
    pub fn from_unsorted(mut rows: Vec<Reading>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        let mut deduped: Vec<Reading> = Vec::with_capacity(rows.len());
        for row in rows {
            match deduped.last_mut() {
                Some(last) if last.timestamp == row.timestamp => *last = row,
                _ => deduped.push(row),
            }
        }
        Self { rows: deduped }
    }

    /// Concatenate several sources, then sort and dedup as one batch.
    pub fn merge<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<Reading>>,
    {
        let mut all = Vec::new();
        for source in sources {
            all.extend(source);
        }
        Self::from_unsorted(all)
    }

    /// Restrict to rows whose station-local date falls in the closed range.
    pub fn select_range(&self, range: &DateRange) -> Series {
        let rows = self
            .rows
            .iter()
            .filter(|r| {
                let date = r.timestamp.date_naive();
                date >= range.start && date <= range.end
            })
            .copied()
            .collect();
        Series { rows }
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&Reading> {
        self.rows.last()
    }
}
