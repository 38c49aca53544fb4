//! Database schema management for `greenhouse-monitor`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs`.
//!
//! Reading retention (30 days) belongs to the database operator; this
//! service never deletes rows.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates `systems`, `sensors`, `readings` and `watering_schedules`. Safe to
/// call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // One row per greenhouse
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS systems (
            id         UUID        PRIMARY KEY,
            user_id    UUID,
            name       TEXT        NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Sensors are addressed by the numeric id flashed into the device
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensors (
            hardware_id BIGINT      PRIMARY KEY,
            system_id   UUID        NOT NULL REFERENCES systems (id),
            name        TEXT,
            location    TEXT,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Raw samples; either measurement may be missing
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id          UUID             PRIMARY KEY,
            sensor_id   BIGINT           NOT NULL,
            temperature DOUBLE PRECISION,
            humidity    DOUBLE PRECISION,
            created_at  TIMESTAMPTZ      NOT NULL DEFAULT now()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS watering_schedules (
            system_id          UUID        PRIMARY KEY,
            next_watering_time TIMESTAMPTZ NOT NULL,
            frequency_days     INTEGER     NOT NULL CHECK (frequency_days >= 1),
            is_active          BOOLEAN     NOT NULL DEFAULT TRUE
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensors_system_id
            ON sensors (system_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Serves the newest-first fetch per sensor
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_readings_sensor_created
            ON readings (sensor_id, created_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
