//! Word colouring endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::services::ColorizedWord;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ColorizeQuery {
    pub word: String,
}

/// GET /phonemes/colorize?word=...
pub async fn colorize_word(
    State(state): State<AppState>,
    query: Result<Query<ColorizeQuery>, QueryRejection>,
) -> ApiResult<Json<ColorizedWord>> {
    let Query(query) = query?;
    let word = query.word.trim().to_string();
    if word.is_empty() {
        return Err(ApiError::BadRequest("word must not be empty".to_string()));
    }

    Ok(Json(state.assessor.colorize(word).await?))
}

pub fn phoneme_routes() -> Router<AppState> {
    Router::new().route("/phonemes/colorize", get(colorize_word))
}
