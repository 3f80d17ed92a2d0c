//! CSV export of processed series

use shared::{write_csv, DateRange, Granularity, ProcessedSeries};

use crate::error::AppResult;

/// Export service rendering processed series as CSV attachments
pub struct ExportService;

impl ExportService {
    /// Render a processed series as a CSV document
    pub fn render(series: &ProcessedSeries) -> AppResult<String> {
        Ok(write_csv(series)?)
    }

    /// Attachment filename for a range and granularity
    pub fn attachment_name(range: &DateRange, granularity: Granularity) -> String {
        format!(
            "weather_{}_{}_{}.csv",
            range.start.format("%Y%m%d"),
            range.end.format("%Y%m%d"),
            granularity.as_str()
        )
    }
}
