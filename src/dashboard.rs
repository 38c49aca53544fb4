//! Dashboard view assembly.
//!
//! Runs the full reading pipeline for one system:
//! raw rows → normalize → sensor filter → {chart, latest snapshot → status,
//! history}. [`build_dashboard`] is pure; [`load_dashboard`] adds the fetch
//! from the storage collaborators.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::chart::{self, BucketPolicy, CombinedPoint};
use crate::models::{normalize_all, RawReading, Schedule, SensorReading};
use crate::pipeline::{
    filter_by_sensor, latest_snapshot, sort_history, LatestSnapshot, SensorSelector,
};
use crate::status::{PlantStatus, RangeStatus, OPTIMAL_HUMIDITY, OPTIMAL_TEMPERATURE};
use crate::store::{ReadingSource, ScheduleSource};
use crate::watering;

// ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardStatus {
    pub temperature: RangeStatus,
    pub humidity: RangeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantHealth {
    pub status: PlantStatus,
    pub message: &'static str,
}

/// Everything the dashboard page renders for one system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    // ---
    pub system_id: Uuid,
    pub sensor: String,
    pub latest: LatestSnapshot,
    pub status: PlantHealth,
    pub cards: CardStatus,
    pub chart: Vec<CombinedPoint>,
    pub history: Vec<SensorReading>,
    pub schedule: Option<Schedule>,
    pub watering_due: bool,
}

/// Per-request pipeline options.
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    pub selector: SensorSelector,
    pub policy: BucketPolicy,
}

/// Build the dashboard from already-fetched rows.
pub fn build_dashboard(
    system_id: Uuid,
    rows: &[RawReading],
    schedule: Option<Schedule>,
    request: &DashboardRequest,
    now: DateTime<Utc>,
    watering_lead: Duration,
) -> DashboardView {
    // ---
    let readings = filter_by_sensor(normalize_all(rows), &request.selector);

    let chart = chart::aggregate_with(&readings, request.policy);
    let latest = latest_snapshot(&readings);
    let history = sort_history(&readings);

    let temperature = latest.temperature_value();
    let humidity = latest.humidity_value();
    let status = PlantStatus::classify(temperature, humidity);

    let watering_due = schedule
        .as_ref()
        .is_some_and(|s| watering::is_due(s, now, watering_lead));

    DashboardView {
        system_id,
        sensor: request.selector.to_string(),
        status: PlantHealth {
            status,
            message: status.message(),
        },
        cards: CardStatus {
            temperature: OPTIMAL_TEMPERATURE.classify(temperature),
            humidity: OPTIMAL_HUMIDITY.classify(humidity),
        },
        latest,
        chart,
        history,
        schedule,
        watering_due,
    }
}

/// Fetch rows and schedule for `system_id`, then build the dashboard.
pub async fn load_dashboard<S>(
    store: &S,
    system_id: Uuid,
    request: &DashboardRequest,
    watering_lead: Duration,
) -> Result<DashboardView>
where
    S: ReadingSource + ScheduleSource,
{
    // ---
    let rows = store.fetch_readings(system_id).await?;
    let schedule = store.fetch_schedule(system_id).await?;

    Ok(build_dashboard(
        system_id,
        &rows,
        schedule,
        request,
        Utc::now(),
        watering_lead,
    ))
}
