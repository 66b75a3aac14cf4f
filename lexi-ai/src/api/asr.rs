//! Read-aloud evaluation endpoints
//!
//! - `POST /asr/evaluate?expected_text=...` with the audio clip as the body
//! - `POST /asr/analyze` with already-transcribed text

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    routing::post,
    Json, Router,
};
use lexi_common::SessionAnalysis;
use serde::Deserialize;
use tracing::warn;

use crate::services::{AssessmentError, Evaluation};
use crate::{ApiError, ApiResult, AppState};

/// Upload cap for one clip
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct EvaluateQuery {
    pub expected_text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub expected_text: String,
    pub spoken_text: String,
}

/// POST /asr/evaluate
pub async fn evaluate_read_aloud(
    State(state): State<AppState>,
    query: Result<Query<EvaluateQuery>, QueryRejection>,
    audio: Bytes,
) -> ApiResult<Json<Evaluation>> {
    let Query(query) = query?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("Audio body is empty".to_string()));
    }

    match state
        .assessor
        .evaluate(audio.to_vec(), query.expected_text)
        .await
    {
        Ok(evaluation) => Ok(Json(evaluation)),
        Err(e) => {
            if let AssessmentError::Transcription(ref cause) = e {
                warn!(error = %cause, "Transcription failed");
                *state.last_error.write().await = Some(cause.to_string());
            }
            Err(e.into())
        }
    }
}

/// POST /asr/analyze
pub async fn analyze_text(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<SessionAnalysis>> {
    let Json(request) = request?;
    let analysis = state
        .assessor
        .analyze(request.expected_text, request.spoken_text)
        .await?;
    Ok(Json(analysis))
}

pub fn asr_routes() -> Router<AppState> {
    Router::new()
        .route("/asr/evaluate", post(evaluate_read_aloud))
        .route("/asr/analyze", post(analyze_text))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES))
}
