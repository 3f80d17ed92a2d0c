//! Time-bucket aggregation in station-local time
//!
//! Buckets are left-closed, right-open intervals aligned to the station's
//! local clock: `[HH:00, HH:10)` for ten-minute buckets, `[HH:00, HH+1:00)`
//! for hourly, local midnight to local midnight for daily. A bucket holding
//! no readings is omitted rather than emitted as a null row.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Offset, TimeZone};

use crate::models::{Reading, Series};
use crate::schema::SensorField;
use crate::types::Granularity;

#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: u32,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / f64::from(self.count))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketAcc {
    fields: [MeanAcc; SensorField::ALL.len()],
}

/// Aggregate a series into clock-aligned buckets, averaging each sensor
/// field over the values present in the bucket.
///
/// `Raw` returns the series unchanged. Aggregation is idempotent for a
/// given granularity: bucket starts are fixed points of the alignment.
pub fn aggregate(series: &Series, granularity: Granularity) -> Series {
    let width = match granularity.bucket_seconds() {
        Some(width) => width,
        None => return series.clone(),
    };
    let offset = match series.rows().first() {
        Some(first) => first.timestamp.offset().fix(),
        None => return Series::empty(),
    };

    let mut buckets: BTreeMap<i64, BucketAcc> = BTreeMap::new();
    for row in series.rows() {
        let local_secs = row.timestamp.naive_local().and_utc().timestamp();
        let key = local_secs.div_euclid(width) * width;
        let acc = buckets.entry(key).or_default();
        for (slot, field) in acc.fields.iter_mut().zip(SensorField::ALL) {
            if let Some(value) = row.get(field) {
                slot.push(value);
            }
        }
    }

    let rows = buckets
        .into_iter()
        .filter_map(|(local_secs, acc)| {
            let utc_secs = local_secs - i64::from(offset.local_minus_utc());
            let timestamp = offset.timestamp_opt(utc_secs, 0).single()?;
            let mut row = Reading::at(timestamp);
            for (slot, field) in acc.fields.iter().zip(SensorField::ALL) {
                if let Some(mean) = slot.mean() {
                    row.set(field, mean);
                }
            }
            Some(row)
        })
        .collect();
    Series::from_unsorted(rows)
}

/// The local bucket start for a timestamp, at the given granularity.
///
/// `Raw` leaves the timestamp untouched.
pub fn bucket_start(
    timestamp: DateTime<FixedOffset>,
    granularity: Granularity,
) -> DateTime<FixedOffset> {
    let width = match granularity.bucket_seconds() {
        Some(width) => width,
        None => return timestamp,
    };
    let offset = timestamp.offset().fix();
    let local_secs = timestamp.naive_local().and_utc().timestamp();
    let aligned = local_secs.div_euclid(width) * width;
    offset
        .timestamp_opt(aligned - i64::from(offset.local_minus_utc()), 0)
        .single()
        .unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn reading(h: u32, m: u32, temp: f64) -> Reading {
        let mut row = Reading::at(kst().with_ymd_and_hms(2023, 10, 1, h, m, 0).unwrap());
        row.temp = Some(temp);
        row
    }

    #[test]
    fn test_raw_granularity_is_identity() {
        let series = Series::from_unsorted(vec![reading(3, 17, 1.0), reading(3, 19, 2.0)]);
        assert_eq!(aggregate(&series, Granularity::Raw), series);
    }

    #[test]
    fn test_ten_minute_buckets_align_to_clock() {
        let series = Series::from_unsorted(vec![
            reading(3, 11, 10.0),
            reading(3, 19, 20.0),
            reading(3, 21, 30.0),
        ]);
        let out = aggregate(&series, Granularity::TenMin);
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0].timestamp.minute(), 10);
        assert_eq!(out.rows()[0].temp, Some(15.0));
        assert_eq!(out.rows()[1].timestamp.minute(), 20);
        assert_eq!(out.rows()[1].temp, Some(30.0));
    }

    #[test]
    fn test_sparse_hour_yields_single_bucket() {
        let series = Series::from_unsorted(vec![reading(7, 42, 12.0)]);
        let out = aggregate(&series, Granularity::Hour);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].timestamp.hour(), 7);
        assert_eq!(out.rows()[0].timestamp.minute(), 0);
        assert_eq!(out.rows()[0].temp, Some(12.0));
    }

    #[test]
    fn test_daily_buckets_split_on_local_midnight() {
        // 23:50 and 00:10 local sit on opposite sides of local midnight even
        // though they are 20 minutes apart.
        let late = reading(23, 50, 5.0);
        let mut early = Reading::at(kst().with_ymd_and_hms(2023, 10, 2, 0, 10, 0).unwrap());
        early.temp = Some(7.0);
        let out = aggregate(&Series::from_unsorted(vec![late, early]), Granularity::Day);
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0].timestamp.hour(), 0);
        assert_eq!(
            out.rows()[1].timestamp.date_naive(),
            chrono::NaiveDate::from_ymd_opt(2023, 10, 2).unwrap()
        );
    }

    #[test]
    fn test_mean_skips_missing_values() {
        let mut partial = reading(3, 11, 10.0);
        partial.humid = Some(60.0);
        let out = aggregate(
            &Series::from_unsorted(vec![partial, reading(3, 15, 20.0)]),
            Granularity::TenMin,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].temp, Some(15.0));
        // Only one row carried humidity, so the mean is over one value.
        assert_eq!(out.rows()[0].humid, Some(60.0));
    }

    #[test]
    fn test_empty_series_aggregates_empty() {
        assert!(aggregate(&Series::empty(), Granularity::Day).is_empty());
    }

    #[test]
    fn test_bucket_start_is_idempotent() {
        let ts = kst().with_ymd_and_hms(2023, 10, 1, 13, 47, 31).unwrap();
        let aligned = bucket_start(ts, Granularity::TenMin);
        assert_eq!(aligned.minute(), 40);
        assert_eq!(aligned.second(), 0);
        assert_eq!(bucket_start(aligned, Granularity::TenMin), aligned);
    }
}
