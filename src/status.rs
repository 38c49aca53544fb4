//! Plant health and card status derived from the latest snapshot.

use serde::Serialize;

// ---

pub const HOT_ABOVE_C: f64 = 28.0;
pub const COLD_BELOW_C: f64 = 15.0;
pub const DRY_BELOW_PCT: f64 = 50.0;
pub const WET_ABOVE_PCT: f64 = 90.0;

/// Discrete plant-health state shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantStatus {
    Happy,
    Sleeping,
    Hot,
    Cold,
    Thirsty,
    Dying,
}

impl PlantStatus {
    /// First matching rule wins. High humidity never changes the outcome.
    pub fn classify(temperature: Option<f64>, humidity: Option<f64>) -> Self {
        // ---
        let (Some(t), Some(h)) = (temperature, humidity) else {
            return PlantStatus::Sleeping;
        };

        let is_hot = t > HOT_ABOVE_C;
        let is_cold = t < COLD_BELOW_C;
        let is_dry = h < DRY_BELOW_PCT;

        if is_hot && is_dry {
            PlantStatus::Dying
        } else if is_hot {
            PlantStatus::Hot
        } else if is_cold {
            PlantStatus::Cold
        } else if is_dry {
            PlantStatus::Thirsty
        } else {
            PlantStatus::Happy
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlantStatus::Happy => "Feeling great!",
            PlantStatus::Sleeping => "Waiting for data...",
            PlantStatus::Hot => "It is too hot in here.",
            PlantStatus::Cold => "Brrr, it is cold.",
            PlantStatus::Thirsty => "I need water, please.",
            PlantStatus::Dying => "Help! Hot and thirsty.",
        }
    }
}

/// Inclusive band a card value should sit in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

pub const OPTIMAL_TEMPERATURE: OptimalRange = OptimalRange {
    min: COLD_BELOW_C,
    max: HOT_ABOVE_C,
};

pub const OPTIMAL_HUMIDITY: OptimalRange = OptimalRange {
    min: DRY_BELOW_PCT,
    max: WET_ABOVE_PCT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Unknown,
    Optimal,
    Low,
    High,
}

impl OptimalRange {
    pub fn classify(&self, value: Option<f64>) -> RangeStatus {
        match value {
            None => RangeStatus::Unknown,
            Some(v) if v >= self.min && v <= self.max => RangeStatus::Optimal,
            Some(v) if v < self.min => RangeStatus::Low,
            Some(_) => RangeStatus::High,
        }
    }
}
