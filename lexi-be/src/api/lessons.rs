//! Lesson recommendation and drill words

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use lexi_common::profile::select_next;
use lexi_common::Recommendation;
use serde::{Deserialize, Serialize};

use crate::db::profiles;
use crate::drills::{drill_words, supported_phonemes, DEFAULT_DRILL_SIZE};
use crate::models::validate_user_id;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct NextLessonQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DrillQuery {
    pub phoneme: String,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DrillResponse {
    pub phoneme: String,
    pub words: Vec<String>,
}

/// GET /lessons/next?user_id=...
pub async fn next_lesson(
    State(state): State<AppState>,
    query: Result<Query<NextLessonQuery>, QueryRejection>,
) -> ApiResult<Json<Recommendation>> {
    let Query(query) = query?;
    validate_user_id(&query.user_id).map_err(ApiError::BadRequest)?;

    let profile = profiles::get_profile(&state.db, &query.user_id).await?;
    Ok(Json(select_next(profile.as_ref())))
}

/// GET /lessons/drill?phoneme=...&count=...
pub async fn drill(
    query: Result<Query<DrillQuery>, QueryRejection>,
) -> ApiResult<Json<DrillResponse>> {
    let Query(query) = query?;
    let count = query.count.unwrap_or(DEFAULT_DRILL_SIZE);
    let words = drill_words(&query.phoneme, count).ok_or_else(|| {
        ApiError::NotFound(format!(
            "No drill words for phoneme {:?} (supported: {})",
            query.phoneme,
            supported_phonemes().join(", ")
        ))
    })?;

    Ok(Json(DrillResponse {
        phoneme: query.phoneme,
        words,
    }))
}

pub fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route("/lessons/next", get(next_lesson))
        .route("/lessons/drill", get(drill))
}
