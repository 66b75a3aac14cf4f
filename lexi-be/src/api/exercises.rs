//! Exercise submission

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use lexi_common::profile::aggregate;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::db::submissions;
use crate::models::{
    validate_fraction, validate_user_id, validate_words, ExerciseRecord, ExerciseSubmission,
};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub session_id: Uuid,
}

fn validate(submission: &ExerciseSubmission) -> Result<(), String> {
    validate_user_id(&submission.user_id)?;
    if let Some(accuracy) = submission.accuracy {
        validate_fraction("accuracy", accuracy)?;
    }
    if let Some(words) = &submission.words {
        validate_words(words)?;
    }
    Ok(())
}

/// POST /exercises/submit
pub async fn submit_exercise(
    State(state): State<AppState>,
    submission: Result<Json<ExerciseSubmission>, JsonRejection>,
) -> ApiResult<Json<ExerciseResponse>> {
    let Json(submission) = submission?;
    validate(&submission).map_err(ApiError::BadRequest)?;

    let record = ExerciseRecord::new(submission);
    let delta = aggregate([&record]);
    submissions::record_exercise(&state.db, &record, &delta).await?;

    info!(
        user_id = %record.user_id,
        session_id = %record.id,
        exercise_type = %record.exercise_type,
        words = record.words.len(),
        "Exercise stored"
    );

    Ok(Json(ExerciseResponse {
        session_id: record.id,
    }))
}

pub fn exercise_routes() -> Router<AppState> {
    Router::new().route("/exercises/submit", post(submit_exercise))
}
