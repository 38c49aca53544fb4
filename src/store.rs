//! Storage collaborators backing the dashboard.
//!
//! The pipeline only needs two narrow capabilities, a reading source and a
//! schedule source. [`PgStore`] provides both on top of PostgreSQL and also
//! carries the write paths used by device ingest and schedule editing.

use std::future::Future;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewReading, RawReading, Schedule, SensorId};

// ---

/// Supplies the most recent raw rows of a system, newest first.
pub trait ReadingSource {
    fn fetch_readings(
        &self,
        system_id: Uuid,
    ) -> impl Future<Output = Result<Vec<RawReading>>> + Send;
}

/// Supplies the watering schedule of a system, if one exists.
pub trait ScheduleSource {
    fn fetch_schedule(
        &self,
        system_id: Uuid,
    ) -> impl Future<Output = Result<Option<Schedule>>> + Send;
}

#[derive(Debug, sqlx::FromRow)]
struct ReadingRow {
    id: Uuid,
    sensor_id: i64,
    created_at: DateTime<Utc>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    sensor_name: Option<String>,
}

impl From<ReadingRow> for RawReading {
    fn from(row: ReadingRow) -> Self {
        RawReading {
            id: row.id,
            sensor_id: SensorId::Number(row.sensor_id),
            observed_at: row.created_at.fixed_offset(),
            temperature: row.temperature,
            humidity: row.humidity,
            sensor_name: row.sensor_name,
        }
    }
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    fetch_limit: u32,
}

impl PgStore {
    pub fn new(pool: PgPool, fetch_limit: u32) -> Self {
        Self { pool, fetch_limit }
    }

    /// Persist one device sample and return its id.
    pub async fn insert_reading(&self, reading: &NewReading) -> Result<Uuid> {
        // ---
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO readings (id, sensor_id, temperature, humidity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(reading.sensor_id)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Create or replace the schedule of `schedule.system_id`.
    pub async fn upsert_schedule(&self, schedule: &Schedule) -> Result<Schedule> {
        // ---
        let saved = sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO watering_schedules (system_id, next_watering_time, frequency_days, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (system_id) DO UPDATE SET
                next_watering_time = EXCLUDED.next_watering_time,
                frequency_days     = EXCLUDED.frequency_days,
                is_active          = EXCLUDED.is_active
            RETURNING system_id, next_watering_time, frequency_days, is_active
            "#,
        )
        .bind(schedule.system_id)
        .bind(schedule.next_watering_time)
        .bind(schedule.frequency_days)
        .bind(schedule.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Every schedule currently switched on.
    pub async fn active_schedules(&self) -> Result<Vec<Schedule>> {
        // ---
        let schedules = sqlx::query_as::<_, Schedule>(
            r#"
            SELECT system_id, next_watering_time, frequency_days, is_active
            FROM watering_schedules
            WHERE is_active
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }
}

impl ReadingSource for PgStore {
    async fn fetch_readings(&self, system_id: Uuid) -> Result<Vec<RawReading>> {
        // ---
        let rows = sqlx::query_as::<_, ReadingRow>(
            r#"
            SELECT r.id, r.sensor_id, r.created_at, r.temperature, r.humidity,
                   s.name AS sensor_name
            FROM readings r
            JOIN sensors s ON s.hardware_id = r.sensor_id
            WHERE s.system_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(system_id)
        .bind(i64::from(self.fetch_limit))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(%system_id, rows = rows.len(), "Fetched raw readings");
        Ok(rows.into_iter().map(RawReading::from).collect())
    }
}

impl ScheduleSource for PgStore {
    async fn fetch_schedule(&self, system_id: Uuid) -> Result<Option<Schedule>> {
        // ---
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            SELECT system_id, next_watering_time, frequency_days, is_active
            FROM watering_schedules
            WHERE system_id = $1
            "#,
        )
        .bind(system_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }
}
