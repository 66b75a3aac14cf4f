//! lexi-be library interface
//!
//! Learner-side service: stores assessment and exercise sessions, keeps each
//! learner's phoneme profile and recommends what to practise next.

pub mod api;
pub mod db;
pub mod drills;
pub mod error;
pub mod models;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::assessment_routes())
        .merge(api::exercise_routes())
        .merge(api::lesson_routes())
        .merge(api::profile_routes())
        .merge(api::analytics_routes())
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
