//! Data models for the greenhouse reading pipeline.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---

/// Name used when a raw row arrives without its sensor's name.
pub const UNKNOWN_SENSOR_NAME: &str = "Sensor";

/// Sensor identity as it travels through the pipeline.
///
/// Devices register with a numeric hardware id, but ids coming back from
/// query strings or older clients are strings. Both forms compare through
/// [`SensorId::canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorId {
    Number(i64),
    Text(String),
}

impl SensorId {
    /// Canonical string form used for cross-type comparison.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorId::Number(n) => write!(f, "{n}"),
            SensorId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SensorId {
    fn from(n: i64) -> Self {
        SensorId::Number(n)
    }
}

impl From<&str> for SensorId {
    fn from(s: &str) -> Self {
        SensorId::Text(s.to_owned())
    }
}

/// The two measurement kinds a greenhouse sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    Temperature,
    Humidity,
}

impl fmt::Display for ReadingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadingType::Temperature => "temperature",
            ReadingType::Humidity => "humidity",
        };
        f.write_str(s)
    }
}

/// A stored sample row. One row may carry both measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    // ---
    pub id: Uuid,
    pub sensor_id: SensorId,
    pub observed_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub sensor_name: Option<String>,
}

/// A single-measurement reading derived from a [`RawReading`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    // ---
    pub id: Uuid,
    pub sensor_id: SensorId,
    pub value: f64,
    pub observed_at: DateTime<FixedOffset>,
    pub reading_type: ReadingType,
    pub sensor_name: String,
}

/// Device ingest payload for `POST /api/readings`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    // ---
    pub sensor_id: i64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// Watering schedule of one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Schedule {
    // ---
    pub system_id: Uuid,
    pub next_watering_time: DateTime<Utc>,
    pub frequency_days: i32,
    pub is_active: bool,
}

/// Split a raw row into typed readings
impl RawReading {
    // ---
    /// Emits a temperature reading, then a humidity reading, for whichever
    /// measurements are present. A row with neither yields nothing.
    pub fn to_readings(&self) -> Vec<SensorReading> {
        // ---
        let sensor_name = self
            .sensor_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_SENSOR_NAME.to_string());

        [
            (ReadingType::Temperature, self.temperature),
            (ReadingType::Humidity, self.humidity),
        ]
        .into_iter()
        .filter_map(|(reading_type, value)| {
            value.map(|value| SensorReading {
                id: self.id,
                sensor_id: self.sensor_id.clone(),
                value,
                observed_at: self.observed_at,
                reading_type,
                sensor_name: sensor_name.clone(),
            })
        })
        .collect()
    }
}

/// Normalize a batch of raw rows, preserving row order.
pub fn normalize_all(rows: &[RawReading]) -> Vec<SensorReading> {
    // ---
    rows.iter().flat_map(RawReading::to_readings).collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn create_test_raw_reading(temperature: Option<f64>, humidity: Option<f64>) -> RawReading {
        // ---
        RawReading {
            id: Uuid::new_v4(),
            sensor_id: SensorId::Number(7),
            observed_at: Utc
                .with_ymd_and_hms(2025, 3, 26, 18, 45, 0)
                .unwrap()
                .fixed_offset(),
            temperature,
            humidity,
            sensor_name: Some("Bench A".to_string()),
        }
    }

    #[test]
    fn test_co_sampled_row_yields_both_types() {
        // ---
        let raw = create_test_raw_reading(Some(22.5), Some(80.1));
        let readings = raw.to_readings();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].reading_type, ReadingType::Temperature);
        assert_eq!(readings[0].value, 22.5);
        assert_eq!(readings[1].reading_type, ReadingType::Humidity);
        assert_eq!(readings[1].value, 80.1);
    }

    #[test]
    fn test_single_measurement_rows() {
        // ---
        let temp_only = create_test_raw_reading(Some(19.0), None).to_readings();
        assert_eq!(temp_only.len(), 1);
        assert_eq!(temp_only[0].reading_type, ReadingType::Temperature);

        let hum_only = create_test_raw_reading(None, Some(55.0)).to_readings();
        assert_eq!(hum_only.len(), 1);
        assert_eq!(hum_only[0].reading_type, ReadingType::Humidity);
    }

    #[test]
    fn test_empty_row_yields_nothing() {
        // ---
        let raw = create_test_raw_reading(None, None);
        assert!(raw.to_readings().is_empty());
    }

    #[test]
    fn test_zero_values_are_still_emitted() {
        // ---
        let readings = create_test_raw_reading(Some(0.0), Some(0.0)).to_readings();
        assert_eq!(readings.len(), 2);
        assert!(readings.iter().all(|r| r.value == 0.0));
    }

    #[test]
    fn test_data_preservation() {
        // ---
        let raw = create_test_raw_reading(Some(20.0), Some(45.0));
        for reading in raw.to_readings() {
            assert_eq!(reading.id, raw.id);
            assert_eq!(reading.sensor_id, SensorId::Number(7));
            assert_eq!(reading.observed_at, raw.observed_at);
            assert_eq!(reading.sensor_name, "Bench A");
        }
    }

    #[test]
    fn test_missing_sensor_name_uses_placeholder() {
        // ---
        let mut raw = create_test_raw_reading(Some(20.0), None);
        raw.sensor_name = None;
        assert_eq!(raw.to_readings()[0].sensor_name, UNKNOWN_SENSOR_NAME);
    }

    #[test]
    fn test_sensor_id_accepts_number_or_string() {
        // ---
        let numeric: SensorId = serde_json::from_str("7").unwrap();
        let text: SensorId = serde_json::from_str("\"7\"").unwrap();

        assert_eq!(numeric, SensorId::Number(7));
        assert_eq!(text, SensorId::Text("7".to_string()));
        assert_eq!(numeric.canonical(), text.canonical());
    }

    #[test]
    fn test_normalize_all_keeps_row_order() {
        // ---
        let first = create_test_raw_reading(Some(21.0), Some(60.0));
        let second = create_test_raw_reading(None, Some(61.0));
        let readings = normalize_all(&[first.clone(), second.clone()]);

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].id, first.id);
        assert_eq!(readings[1].id, first.id);
        assert_eq!(readings[2].id, second.id);
    }
}
