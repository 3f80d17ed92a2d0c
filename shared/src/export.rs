//! CSV export of processed series

use std::string::FromUtf8Error;

use thiserror::Error;

use crate::models::ProcessedSeries;
use crate::schema::SensorField;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),

    #[error("exported CSV is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Serialize a processed series as CSV.
///
/// The sensor columns are always present; metric columns (`vpd`, `dli`,
/// `gdd`) appear only when at least one row carries the metric, so a request
/// whose source lacked radiation data exports without a `dli` column rather
/// than with an all-empty one. Timestamps use RFC 3339 with the station
/// offset; absent values export as empty cells.
pub fn write_csv(series: &ProcessedSeries) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let columns = series.metric_columns();

    let mut header: Vec<&str> = Vec::with_capacity(10);
    header.push("timestamp");
    for field in SensorField::ALL {
        header.push(field.name());
    }
    if columns.vpd {
        header.push("vpd");
    }
    if columns.dli {
        header.push("dli");
    }
    if columns.gdd {
        header.push("gdd");
    }
    writer.write_record(&header)?;

    for row in &series.rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.timestamp.to_rfc3339());
        for field in SensorField::ALL {
            record.push(cell(row.sensor(field)));
        }
        if columns.vpd {
            record.push(cell(row.vpd));
        }
        if columns.dli {
            record.push(cell(row.dli));
        }
        if columns.gdd {
            record.push(cell(row.gdd));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
