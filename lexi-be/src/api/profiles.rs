//! Learner profile inspection and reset

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use lexi_common::PhonemeProfile;
use serde::Serialize;
use tracing::info;

use crate::db::profiles;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub phonemes: PhonemeProfile,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub user_id: String,
    /// Number of phoneme rows deleted
    pub removed: u64,
}

/// GET /profiles/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let phonemes = profiles::get_profile(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No profile for user {}", user_id)))?;

    Ok(Json(ProfileResponse { user_id, phonemes }))
}

/// DELETE /profiles/:user_id
pub async fn reset_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ResetResponse>> {
    let removed = profiles::reset_profile(&state.db, &user_id).await?;
    info!(user_id = %user_id, removed, "Profile reset");

    Ok(Json(ResetResponse { user_id, removed }))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profiles/:user_id", get(get_profile).delete(reset_profile))
}
