//! Raw reading endpoints: device ingest and the newest-first raw listing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::AppState;
use crate::{AppError, NewReading, ReadingSource};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/readings", post(ingest))
        .route("/api/readings/{system_id}", get(list))
}

/// Handle `POST /api/readings` from a sensor node.
async fn ingest(
    State((store, _config)): State<AppState>,
    Json(reading): Json<NewReading>,
) -> Result<impl IntoResponse, AppError> {
    // ---
    info!(sensor_id = reading.sensor_id, "POST /api/readings");

    validate(&reading)?;
    let id = store.insert_reading(&reading).await?;

    debug!(%id, "Stored reading");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reading stored", "id": id })),
    ))
}

/// Handle `GET /api/readings/{system_id}`.
async fn list(
    Path(system_id): Path<Uuid>,
    State((store, _config)): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    // ---
    info!(%system_id, "GET /api/readings");

    let rows = store.fetch_readings(system_id).await?;
    Ok(Json(rows))
}

fn validate(reading: &NewReading) -> Result<(), AppError> {
    // ---
    if reading.temperature.is_none() && reading.humidity.is_none() {
        return Err(AppError::BadRequest(
            "reading must carry temperature, humidity or both".into(),
        ));
    }

    let finite = |v: Option<f64>| v.map_or(true, f64::is_finite);
    if !finite(reading.temperature) || !finite(reading.humidity) {
        return Err(AppError::BadRequest("measurements must be finite numbers".into()));
    }

    Ok(())
}
