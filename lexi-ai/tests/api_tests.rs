//! Integration tests for lexi-ai endpoints
//!
//! The transcriber is replaced by in-process fakes and the grapheme
//! phonemizer stands in for espeak, so no external programs are needed.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use lexi_ai::services::{AssessmentService, TranscribeError, Transcriber, Transcription};
use lexi_ai::AppState;
use lexi_common::assessment::WordAligner;
use lexi_common::phonemizer::GraphemePhonemizer;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

struct FixedTranscriber(&'static str);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<Transcription, TranscribeError> {
        if audio.is_empty() {
            return Err(TranscribeError::EmptyAudio);
        }
        Ok(Transcription {
            text: self.0.to_string(),
            duration_seconds: Some(1.5),
        })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct DownTranscriber;

#[async_trait]
impl Transcriber for DownTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>) -> Result<Transcription, TranscribeError> {
        Err(TranscribeError::Unavailable)
    }

    fn name(&self) -> &str {
        "down"
    }
}

struct GarbledTranscriber;

#[async_trait]
impl Transcriber for GarbledTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>) -> Result<Transcription, TranscribeError> {
        Err(TranscribeError::Parse("missing field `text`".to_string()))
    }

    fn name(&self) -> &str {
        "garbled"
    }
}

fn create_test_app(transcriber: Arc<dyn Transcriber>) -> axum::Router {
    let aligner = WordAligner::new(Arc::new(GraphemePhonemizer::new()));
    let state = AppState::new(AssessmentService::new(aligner, transcriber));
    lexi_ai::build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(Arc::new(FixedTranscriber("")));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "lexi-ai");
    assert_eq!(json["phonemizer"], "grapheme");
    assert_eq!(json["transcriber"], "fixed");
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_analyze_text() {
    let app = create_test_app(Arc::new(FixedTranscriber("")));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/analyze")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"expected_text": "The bat dog", "spoken_text": "the dat"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let words = json["words"].as_array().unwrap();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0]["error_type"], "correct");
    assert_eq!(words[1]["error_type"], "substitution_similar");
    assert_eq!(words[1]["mistaken_phoneme"], "b");
    assert_eq!(words[1]["substituted_with"], "d");
    assert_eq!(words[2]["error_type"], "omission");
    assert_eq!(words[2]["spoken"], "");
    assert_eq!(json["accuracy"], 0.333);
    assert_eq!(json["expected_text"], "The bat dog");
}

#[tokio::test]
async fn test_evaluate_read_aloud() {
    let app = create_test_app(Arc::new(FixedTranscriber("bat dog")));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/evaluate?expected_text=bat%20dog")
        .header("content-type", "application/octet-stream")
        .body(Body::from(vec![0u8; 64]))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["transcription"]["text"], "bat dog");
    assert_eq!(json["transcription"]["duration_seconds"], 1.5);
    assert_eq!(json["analysis"]["accuracy"], 1.0);
    assert_eq!(json["analysis"]["spoken_text"], "bat dog");
}

#[tokio::test]
async fn test_evaluate_rejects_empty_audio() {
    let app = create_test_app(Arc::new(FixedTranscriber("bat")));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/evaluate?expected_text=bat")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_transcriber_outage_is_503_and_reported() {
    let app = create_test_app(Arc::new(DownTranscriber));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/evaluate?expected_text=bat")
        .body(Body::from(vec![1u8; 16]))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["last_error"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_colorize_word() {
    let app = create_test_app(Arc::new(FixedTranscriber("")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/phonemes/colorize?word=ship")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["word"], "ship");
    assert_eq!(json["graphemes"], json!(["s", "h", "i", "p"]));
    assert_eq!(
        json["colors"],
        json!(["#4F46E5", "#FB923C", "#10B981", "#EF4444"])
    );
    assert_eq!(json["phonemes"], "sh i p");
}

#[tokio::test]
async fn test_colorize_requires_word() {
    let app = create_test_app(Arc::new(FixedTranscriber("")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/phonemes/colorize?word=%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_transcript_is_500() {
    let app = create_test_app(Arc::new(GarbledTranscriber));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/evaluate?expected_text=bat")
        .body(Body::from(vec![1u8; 16]))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_malformed_analyze_body_uses_error_envelope() {
    let app = create_test_app(Arc::new(FixedTranscriber("")));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/analyze")
        .header("content-type", "application/json")
        .body(Body::from(json!({"expected_text": "bat"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("spoken_text"));
}

#[tokio::test]
async fn test_missing_query_uses_error_envelope() {
    let app = create_test_app(Arc::new(FixedTranscriber("bat")));

    let request = Request::builder()
        .method("POST")
        .uri("/asr/evaluate")
        .body(Body::from(vec![1u8; 16]))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/phonemes/colorize")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}
