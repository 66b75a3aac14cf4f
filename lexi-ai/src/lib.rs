//! lexi-ai library interface
//!
//! Speech-side service: transcribes read-aloud audio and scores it word by
//! word against the expected text.

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::AssessmentService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub assessor: Arc<AssessmentService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last transcription failure for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(assessor: AssessmentService) -> Self {
        Self {
            assessor: Arc::new(assessor),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::asr_routes())
        .merge(api::phoneme_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
