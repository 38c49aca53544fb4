//! `GET /api/dashboard/{system_id}`: the aggregated view behind the
//! dashboard page (snapshot, status, chart series, history, schedule).

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::{load_dashboard, AppError, BucketPolicy, DashboardRequest, SensorSelector};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/dashboard/{system_id}", get(handler))
}

/// Query parameters selecting the sensor and bucket policy.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    sensor: Option<SensorSelector>,
    #[serde(default)]
    policy: Option<BucketPolicy>,
}

async fn handler(
    Path(system_id): Path<Uuid>,
    Query(params): Query<DashboardQuery>,
    State((store, config)): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    // ---
    info!(%system_id, ?params, "GET /api/dashboard");

    let request = DashboardRequest {
        selector: params.sensor.unwrap_or_default(),
        policy: params.policy.unwrap_or(config.chart_bucket_policy),
    };

    let view = load_dashboard(&store, system_id, &request, config.watering_lead()).await?;

    info!(
        %system_id,
        points = view.chart.len(),
        history = view.history.len(),
        status = ?view.status.status,
        "Dashboard built"
    );
    Ok(Json(view))
}
