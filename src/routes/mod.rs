use axum::Router;

use crate::{Config, PgStore};

mod dashboard;
mod health;
mod readings;
mod schedule;

// ---

/// Shared handler state: the storage collaborator plus the loaded config.
pub type AppState = (PgStore, Config);

pub fn router(store: PgStore, config: Config) -> Router {
    // ---
    Router::new()
        .merge(readings::router())
        .merge(dashboard::router())
        .merge(schedule::router())
        .merge(health::router())
        .with_state((store, config))
}
