//! Minute-bucketed chart series.
//!
//! Readings of both types are grouped by their timestamp truncated to the
//! minute and merged into one [`CombinedPoint`] per bucket, so the dashboard
//! can draw temperature and humidity as two lines on one time axis. A bucket
//! that only saw one measurement type leaves the other field empty; the
//! chart treats that as a gap, never as zero.

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{ReadingType, SensorReading};

// ---

/// One chart point per minute bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPoint {
    // ---
    pub bucket_key: DateTime<FixedOffset>,
    /// `HH:MM`, 24-hour clock, in the bucket's own offset.
    pub display_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

/// How several same-type readings inside one bucket collapse to one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketPolicy {
    /// The reading seen last in input order wins.
    #[default]
    LastSeen,
    /// The reading with the greatest `observed_at` wins; ties go to the
    /// one seen later.
    Latest,
    /// Arithmetic mean of every value in the bucket.
    Average,
}

impl FromStr for BucketPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last_seen" => Ok(BucketPolicy::LastSeen),
            "latest" => Ok(BucketPolicy::Latest),
            "average" => Ok(BucketPolicy::Average),
            other => Err(anyhow!(
                "unknown bucket policy '{other}' (expected last_seen, latest or average)"
            )),
        }
    }
}

/// Zero the seconds and sub-seconds of `ts`, keeping its offset.
pub fn truncate_to_minute(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    // ---
    ts - Duration::seconds(i64::from(ts.second()))
        - Duration::nanoseconds(i64::from(ts.nanosecond()))
}

/// Running value of one field within one bucket.
#[derive(Debug, Clone, Copy)]
struct FieldAcc {
    value: f64,
    observed_at: DateTime<FixedOffset>,
    sum: f64,
    count: u32,
}

impl FieldAcc {
    fn new(reading: &SensorReading) -> Self {
        Self {
            value: reading.value,
            observed_at: reading.observed_at,
            sum: reading.value,
            count: 1,
        }
    }

    fn push(&mut self, reading: &SensorReading, policy: BucketPolicy) {
        // ---
        self.sum += reading.value;
        self.count += 1;

        match policy {
            BucketPolicy::LastSeen | BucketPolicy::Average => {
                self.value = reading.value;
                self.observed_at = reading.observed_at;
            }
            BucketPolicy::Latest => {
                if reading.observed_at >= self.observed_at {
                    self.value = reading.value;
                    self.observed_at = reading.observed_at;
                }
            }
        }
    }

    fn resolve(&self, policy: BucketPolicy) -> f64 {
        match policy {
            BucketPolicy::Average => self.sum / f64::from(self.count),
            BucketPolicy::LastSeen | BucketPolicy::Latest => self.value,
        }
    }
}

struct Bucket {
    display_time: String,
    temperature: Option<FieldAcc>,
    humidity: Option<FieldAcc>,
}

/// Build the chart series with the default last-seen policy.
pub fn aggregate(readings: &[SensorReading]) -> Vec<CombinedPoint> {
    aggregate_with(readings, BucketPolicy::default())
}

/// Build the chart series, ascending by bucket instant.
pub fn aggregate_with(readings: &[SensorReading], policy: BucketPolicy) -> Vec<CombinedPoint> {
    // ---
    // DateTime orders by instant, so iteration order is chronological.
    let mut buckets: BTreeMap<DateTime<FixedOffset>, Bucket> = BTreeMap::new();

    for reading in readings {
        let key = truncate_to_minute(reading.observed_at);
        let bucket = buckets.entry(key).or_insert_with(|| Bucket {
            display_time: key.format("%H:%M").to_string(),
            temperature: None,
            humidity: None,
        });

        let slot = match reading.reading_type {
            ReadingType::Temperature => &mut bucket.temperature,
            ReadingType::Humidity => &mut bucket.humidity,
        };
        match slot {
            Some(acc) => acc.push(reading, policy),
            None => *slot = Some(FieldAcc::new(reading)),
        }
    }

    tracing::debug!(
        readings = readings.len(),
        points = buckets.len(),
        ?policy,
        "Aggregated chart series"
    );

    buckets
        .into_iter()
        .map(|(bucket_key, bucket)| CombinedPoint {
            bucket_key,
            display_time: bucket.display_time,
            temperature: bucket.temperature.map(|acc| acc.resolve(policy)),
            humidity: bucket.humidity.map(|acc| acc.resolve(policy)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::SensorId;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2023, 10, 27, h, m, s)
            .unwrap()
            .fixed_offset()
    }

    fn reading(
        reading_type: ReadingType,
        value: f64,
        observed_at: DateTime<FixedOffset>,
    ) -> SensorReading {
        SensorReading {
            id: Uuid::new_v4(),
            sensor_id: SensorId::Number(1),
            value,
            observed_at,
            reading_type,
            sensor_name: "S1".to_string(),
        }
    }

    #[test]
    fn test_groups_same_minute_readings() {
        // ---
        let readings = vec![
            reading(ReadingType::Temperature, 22.5, at(10, 0, 0)),
            reading(ReadingType::Humidity, 80.1, at(10, 0, 0)),
            reading(ReadingType::Temperature, 23.0, at(10, 5, 0)),
        ];

        let points = aggregate(&readings);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].temperature, Some(22.5));
        assert_eq!(points[0].humidity, Some(80.1));
        assert_eq!(points[1].temperature, Some(23.0));
        assert_eq!(points[1].humidity, None);
    }

    #[test]
    fn test_empty_input() {
        // ---
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_single_reading_single_field_point() {
        // ---
        let points = aggregate(&[reading(ReadingType::Humidity, 61.0, at(8, 15, 42))]);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].humidity, Some(61.0));
        assert_eq!(points[0].temperature, None);
        assert_eq!(points[0].bucket_key, at(8, 15, 0));
    }

    #[test]
    fn test_seconds_apart_share_a_bucket() {
        // ---
        let points = aggregate(&[
            reading(ReadingType::Temperature, 20.0, at(9, 30, 1)),
            reading(ReadingType::Humidity, 70.0, at(9, 30, 59)),
        ]);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].bucket_key, at(9, 30, 0));
    }

    #[test]
    fn test_output_is_ascending_for_any_order() {
        // ---
        let mut readings = vec![
            reading(ReadingType::Temperature, 1.0, at(12, 0, 0)),
            reading(ReadingType::Temperature, 2.0, at(10, 0, 0)),
            reading(ReadingType::Humidity, 3.0, at(11, 0, 0)),
            reading(ReadingType::Humidity, 4.0, at(10, 30, 0)),
        ];

        let expected: Vec<_> = aggregate(&readings).iter().map(|p| p.bucket_key).collect();
        assert!(expected.windows(2).all(|w| w[0] < w[1]));

        readings.reverse();
        let reversed: Vec<_> = aggregate(&readings).iter().map(|p| p.bucket_key).collect();
        assert_eq!(expected, reversed);
    }

    #[test]
    fn test_last_seen_wins_by_default() {
        // ---
        let readings = vec![
            reading(ReadingType::Temperature, 21.0, at(10, 0, 50)),
            reading(ReadingType::Temperature, 25.0, at(10, 0, 10)),
        ];

        let points = aggregate(&readings);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].temperature, Some(25.0));
    }

    #[test]
    fn test_latest_policy_uses_timestamp() {
        // ---
        let readings = vec![
            reading(ReadingType::Temperature, 21.0, at(10, 0, 50)),
            reading(ReadingType::Temperature, 25.0, at(10, 0, 10)),
        ];

        let points = aggregate_with(&readings, BucketPolicy::Latest);
        assert_eq!(points[0].temperature, Some(21.0));
    }

    #[test]
    fn test_latest_policy_tie_goes_to_later_input() {
        // ---
        let readings = vec![
            reading(ReadingType::Humidity, 60.0, at(10, 0, 30)),
            reading(ReadingType::Humidity, 65.0, at(10, 0, 30)),
        ];

        let points = aggregate_with(&readings, BucketPolicy::Latest);
        assert_eq!(points[0].humidity, Some(65.0));
    }

    #[test]
    fn test_average_policy() {
        // ---
        let readings = vec![
            reading(ReadingType::Temperature, 20.0, at(10, 0, 0)),
            reading(ReadingType::Temperature, 24.0, at(10, 0, 30)),
            reading(ReadingType::Humidity, 50.0, at(10, 0, 45)),
        ];

        let points = aggregate_with(&readings, BucketPolicy::Average);
        assert_eq!(points[0].temperature, Some(22.0));
        assert_eq!(points[0].humidity, Some(50.0));
    }

    #[test]
    fn test_display_time_is_zero_padded_local_fields() {
        // ---
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2023, 10, 27, 7, 5, 33).unwrap();

        let points = aggregate(&[reading(ReadingType::Temperature, 18.0, local)]);

        assert_eq!(points[0].display_time, "07:05");
        assert_eq!(points[0].bucket_key.offset(), &offset);
    }

    #[test]
    fn test_truncation_is_idempotent() {
        // ---
        let readings = vec![
            reading(ReadingType::Temperature, 20.0, at(10, 0, 17)),
            reading(ReadingType::Humidity, 55.0, at(23, 59, 59)),
        ];

        for point in aggregate(&readings) {
            assert_eq!(truncate_to_minute(point.bucket_key), point.bucket_key);
        }
    }

    #[test]
    fn test_truncation_drops_subseconds() {
        // ---
        let ts = at(10, 0, 17) + Duration::milliseconds(250);
        assert_eq!(truncate_to_minute(ts), at(10, 0, 0));
    }

    #[test]
    fn test_policy_parse() {
        // ---
        assert_eq!("last_seen".parse::<BucketPolicy>().unwrap(), BucketPolicy::LastSeen);
        assert_eq!("latest".parse::<BucketPolicy>().unwrap(), BucketPolicy::Latest);
        assert_eq!("average".parse::<BucketPolicy>().unwrap(), BucketPolicy::Average);
        assert!("median".parse::<BucketPolicy>().is_err());
    }
}
