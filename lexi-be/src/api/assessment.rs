//! Assessment submission
//!
//! The client runs every prompt through lexi-ai and posts the analysed
//! questions in one request. The session is stored and its words feed the
//! learner's phoneme profile.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use lexi_common::profile::aggregate;
use lexi_common::PhonemeProfile;
use serde::Serialize;
use tracing::info;

use crate::db::submissions;
use crate::models::{
    validate_fraction, validate_user_id, validate_words, AssessmentRecord, AssessmentSubmission,
};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub status: String,
    pub assessment: AssessmentRecord,
    pub profile_delta: PhonemeProfile,
}

fn validate(submission: &AssessmentSubmission) -> Result<(), String> {
    validate_user_id(&submission.user_id)?;
    for question in &submission.questions {
        validate_fraction("accuracy", question.accuracy)
            .map_err(|e| format!("question {}: {}", question.index, e))?;
        validate_words(&question.words)
            .map_err(|e| format!("question {}: {}", question.index, e))?;
    }
    Ok(())
}

/// POST /assessment/submit
pub async fn submit_assessment(
    State(state): State<AppState>,
    submission: Result<Json<AssessmentSubmission>, JsonRejection>,
) -> ApiResult<Json<AssessmentResponse>> {
    let Json(submission) = submission?;
    validate(&submission).map_err(ApiError::BadRequest)?;

    let record = AssessmentRecord::new(submission);
    let delta = aggregate(&record.questions);
    submissions::record_assessment(&state.db, &record, &delta).await?;

    info!(
        user_id = %record.user_id,
        session_id = %record.id,
        questions = record.questions.len(),
        overall_accuracy = record.overall_accuracy,
        "Assessment stored"
    );

    Ok(Json(AssessmentResponse {
        status: "completed".to_string(),
        assessment: record,
        profile_delta: delta,
    }))
}

pub fn assessment_routes() -> Router<AppState> {
    Router::new().route("/assessment/submit", post(submit_assessment))
}
