//! Watering schedule endpoints, one schedule per system.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::{AppError, Schedule, ScheduleSource};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/schedule", post(save))
        .route("/api/schedule/{system_id}", get(fetch))
}

/// `GET /api/schedule/{system_id}`; 404 with a `null` body when none exists.
async fn fetch(
    Path(system_id): Path<Uuid>,
    State((store, _config)): State<AppState>,
) -> Result<Response, AppError> {
    // ---
    info!(%system_id, "GET /api/schedule");

    let response = match store.fetch_schedule(system_id).await? {
        Some(schedule) => Json(schedule).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::Value::Null)).into_response(),
    };
    Ok(response)
}

/// `POST /api/schedule` creates or replaces the system's schedule.
async fn save(
    State((store, _config)): State<AppState>,
    Json(schedule): Json<Schedule>,
) -> Result<impl IntoResponse, AppError> {
    // ---
    info!(system_id = %schedule.system_id, "POST /api/schedule");

    if schedule.frequency_days < 1 {
        return Err(AppError::BadRequest(
            "frequency_days must be at least 1".into(),
        ));
    }

    let saved = store.upsert_schedule(&schedule).await?;
    Ok(Json(saved))
}
