//! Greenhouse monitoring backend.
//!
//! Turns the raw, append-only stream of temperature/humidity samples posted
//! by greenhouse sensors into what the dashboard shows: the latest value per
//! measurement, a plant-health status, a minute-bucketed dual-line chart
//! series and a newest-first history table. Storage, HTTP routing and the
//! watering reminder task sit around that pipeline.
//!
//! Module layout:
//! - `models`, `chart`, `pipeline`, `status`: the pure reading pipeline
//! - `dashboard`: assembles the pipeline output for one system
//! - `store`, `schema`: PostgreSQL collaborators
//! - `routes`, `error`: the axum HTTP surface
//! - `watering`: schedule due checks
//! - `config`: environment-driven configuration

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod schema;
pub mod status;
pub mod store;
pub mod watering;

pub use config::Config;

// Re-exported so `routes/*.rs` only depend on the crate root, not on the
// layout of sibling modules.
pub use chart::{aggregate, aggregate_with, BucketPolicy, CombinedPoint};
pub use dashboard::{build_dashboard, load_dashboard, DashboardRequest, DashboardView};
pub use error::AppError;
pub use models::{NewReading, RawReading, ReadingType, Schedule, SensorId, SensorReading};
pub use pipeline::{filter_by_sensor, latest_snapshot, sort_history, LatestSnapshot, SensorSelector};
pub use status::PlantStatus;
pub use store::{PgStore, ReadingSource, ScheduleSource};
