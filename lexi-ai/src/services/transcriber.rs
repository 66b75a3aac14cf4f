//! Speech-to-text client
//!
//! Sends raw audio to a whisper-compatible HTTP server and returns the
//! recognised text. The server owns decoding and resampling; this client only
//! forwards bytes and normalises the reply.

use async_trait::async_trait;
use lexi_common::config::TranscriberConfig;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Transcription errors
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Audio body is empty")]
    EmptyAudio,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transcriber unavailable (503)")]
    Unavailable,

    #[error("Transcriber returned status {0}: {1}")]
    Status(u16, String),

    #[error("Unreadable transcriber response: {0}")]
    Parse(String),
}

/// Recognised text for one audio clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    /// Clip length reported by the server, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

/// Speech recogniser collaborator
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<Transcription, TranscribeError>;

    /// Backend name for logs and health output
    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
    #[serde(default)]
    duration: Option<f64>,
}

impl WhisperResponse {
    /// Segment texts trimmed and joined with single spaces, or the flat text
    fn into_transcription(self) -> Transcription {
        let text = if self.segments.is_empty() {
            self.text.trim().to_string()
        } else {
            self.segments
                .iter()
                .map(|s| s.text.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        };

        Transcription {
            text,
            duration_seconds: self.duration,
        }
    }
}

/// HTTP client for a whisper-compatible inference server
pub struct WhisperHttpClient {
    http_client: Client,
    endpoint: String,
    language: String,
}

impl WhisperHttpClient {
    pub fn new(config: &TranscriberConfig) -> Result<Self, TranscribeError> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transcriber for WhisperHttpClient {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<Transcription, TranscribeError> {
        if audio.is_empty() {
            return Err(TranscribeError::EmptyAudio);
        }

        let bytes = audio.len();
        debug!(endpoint = %self.endpoint, bytes, "Sending audio to transcriber");

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("language", self.language.as_str())])
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(audio)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::SERVICE_UNAVAILABLE => {
                warn!(endpoint = %self.endpoint, "Transcriber unavailable");
                return Err(TranscribeError::Unavailable);
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                warn!(
                    endpoint = %self.endpoint,
                    status = %status,
                    error = %error_text,
                    "Transcriber request failed"
                );
                return Err(TranscribeError::Status(status.as_u16(), error_text));
            }
        }

        let body: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;
        let transcription = body.into_transcription();

        debug!(
            endpoint = %self.endpoint,
            words = transcription.text.split_whitespace().count(),
            "Transcription received"
        );

        Ok(transcription)
    }

    fn name(&self) -> &str {
        "whisper-http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_joined() {
        let body: WhisperResponse = serde_json::from_str(
            r#"{"text": "ignored", "segments": [{"text": " the bat "}, {"text": ""}, {"text": "ran"}], "duration": 2.5}"#,
        )
        .unwrap();
        let t = body.into_transcription();
        assert_eq!(t.text, "the bat ran");
        assert_eq!(t.duration_seconds, Some(2.5));
    }

    #[test]
    fn test_flat_text_is_trimmed() {
        let body: WhisperResponse = serde_json::from_str(r#"{"text": "  hello world\n"}"#).unwrap();
        let t = body.into_transcription();
        assert_eq!(t.text, "hello world");
        assert_eq!(t.duration_seconds, None);
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected_without_request() {
        let config = TranscriberConfig {
            endpoint: "http://127.0.0.1:9/inference".to_string(),
            ..TranscriberConfig::default()
        };
        let client = WhisperHttpClient::new(&config).unwrap();
        let err = client.transcribe(Vec::new()).await.unwrap_err();
        assert!(matches!(err, TranscribeError::EmptyAudio));
    }
}
