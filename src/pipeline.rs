//! Reading filters and orderings feeding the dashboard cards and history table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ReadingType, SensorReading};

// ---

/// Which sensors a dashboard view covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SensorSelector {
    #[default]
    All,
    /// Canonical string form of one sensor id.
    Only(String),
}

impl SensorSelector {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => SensorSelector::All,
            id => SensorSelector::Only(id.to_string()),
        }
    }
}

impl fmt::Display for SensorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorSelector::All => f.write_str("all"),
            SensorSelector::Only(id) => f.write_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for SensorSelector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SensorSelector::parse(&raw))
    }
}

/// Keep the readings of the selected sensor, or everything for `All`.
pub fn filter_by_sensor(
    readings: Vec<SensorReading>,
    selector: &SensorSelector,
) -> Vec<SensorReading> {
    // ---
    match selector {
        SensorSelector::All => readings,
        SensorSelector::Only(id) => readings
            .into_iter()
            .filter(|r| r.sensor_id.canonical() == *id)
            .collect(),
    }
}

/// Newest-first copy of `readings`. Equal timestamps keep their input order.
pub fn sort_history(readings: &[SensorReading]) -> Vec<SensorReading> {
    // ---
    let mut sorted = readings.to_vec();
    // `sort_by` is stable
    sorted.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
    sorted
}

/// Most recent reading of each type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatestSnapshot {
    pub temperature: Option<SensorReading>,
    pub humidity: Option<SensorReading>,
}

impl LatestSnapshot {
    pub fn get(&self, reading_type: ReadingType) -> Option<&SensorReading> {
        match reading_type {
            ReadingType::Temperature => self.temperature.as_ref(),
            ReadingType::Humidity => self.humidity.as_ref(),
        }
    }

    pub fn temperature_value(&self) -> Option<f64> {
        self.temperature.as_ref().map(|r| r.value)
    }

    pub fn humidity_value(&self) -> Option<f64> {
        self.humidity.as_ref().map(|r| r.value)
    }
}

/// Sort newest-first, then take the first reading of each type.
///
/// Among readings sharing the newest timestamp, the one earliest in the
/// input wins.
pub fn latest_snapshot(readings: &[SensorReading]) -> LatestSnapshot {
    // ---
    let sorted = sort_history(readings);
    let first_of = |reading_type: ReadingType| {
        sorted
            .iter()
            .find(|r| r.reading_type == reading_type)
            .cloned()
    };

    LatestSnapshot {
        temperature: first_of(ReadingType::Temperature),
        humidity: first_of(ReadingType::Humidity),
    }
}
