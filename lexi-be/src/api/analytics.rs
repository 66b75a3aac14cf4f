//! Per-learner session analytics

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::sessions;
use crate::models::{ExerciseRecord, ExerciseSummary};
use crate::{ApiResult, AppState};

/// Sessions returned when the request does not say
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecentSessionsResponse {
    pub sessions: Vec<ExerciseRecord>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: Vec<ExerciseSummary>,
}

/// GET /analytics/user/:user_id/recent_sessions?limit=...
pub async fn recent_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> ApiResult<Json<RecentSessionsResponse>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let sessions = sessions::recent_sessions(&state.db, &user_id, limit).await?;
    Ok(Json(RecentSessionsResponse { sessions }))
}

/// GET /analytics/user/:user_id/summary
pub async fn summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<SummaryResponse>> {
    let summary = sessions::accuracy_summary(&state.db, &user_id).await?;
    Ok(Json(SummaryResponse { summary }))
}

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/user/:user_id/recent_sessions", get(recent_sessions))
        .route("/analytics/user/:user_id/summary", get(summary))
}
