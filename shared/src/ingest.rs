//! CSV ingestion into the canonical reading schema
//!
//! Accepts both vendor telemetry exports (`created_at`, `field1..field6`)
//! and hand-made uploads with canonical column names. Header matching is
//! case-insensitive and whitespace-trimmed; unknown columns are ignored.

use std::io::Read;

use chrono_tz::Tz;

use crate::models::{Reading, Series};
use crate::schema::{self, SchemaError, SensorField};

/// Parse one CSV source into canonical readings, in file order.
///
/// A missing timestamp column fails the whole file with
/// [`SchemaError::MissingTimestamp`]. Rows whose timestamp cell does not
/// parse are skipped; sensor cells that are empty or non-numeric become
/// absent values rather than zeros.
pub fn read_rows<R: Read>(reader: R, zone: Tz) -> Result<Vec<Reading>, SchemaError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut timestamp_col: Option<usize> = None;
    let mut field_columns: Vec<(usize, SensorField)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if timestamp_col.is_none() && schema::is_timestamp_header(header) {
            timestamp_col = Some(idx);
        } else if let Some(field) = SensorField::resolve(header) {
            field_columns.push((idx, field));
        }
    }
    let timestamp_col = timestamp_col.ok_or(SchemaError::MissingTimestamp)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let raw_ts = match record.get(timestamp_col) {
            Some(cell) => cell,
            None => continue,
        };
        let timestamp = match schema::parse_timestamp(raw_ts, zone) {
            Some(ts) => ts,
            None => continue,
        };
        let mut reading = Reading::at(timestamp);
        for &(idx, field) in &field_columns {
            if let Some(cell) = record.get(idx) {
                if let Ok(value) = cell.trim().parse::<f64>() {
                    reading.set(field, value);
                }
            }
        }
        rows.push(reading);
    }
    Ok(rows)
}

/// Parse one CSV source straight into a sorted, deduplicated series.
pub fn read_series<R: Read>(reader: R, zone: Tz) -> Result<Series, SchemaError> {
    Ok(Series::from_unsorted(read_rows(reader, zone)?))
}
