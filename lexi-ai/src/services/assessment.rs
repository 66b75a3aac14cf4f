//! Assessment service
//!
//! Ties the transcriber and the word aligner together. Alignment calls the
//! phonemizer synchronously (possibly a subprocess per word), so it runs on
//! the blocking pool.

use lexi_common::assessment::{SessionAnalysis, WordAligner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::colorizer::{colorize, ColorizedWord};
use super::transcriber::{TranscribeError, Transcriber, Transcription};

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscribeError),

    #[error("Analysis worker failed: {0}")]
    Worker(String),
}

/// Result of a read-aloud evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub transcription: Transcription,
    pub analysis: SessionAnalysis,
}

pub struct AssessmentService {
    aligner: WordAligner,
    transcriber: Arc<dyn Transcriber>,
}

impl AssessmentService {
    pub fn new(aligner: WordAligner, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            aligner,
            transcriber,
        }
    }

    /// Analyse already-transcribed text
    pub async fn analyze(
        &self,
        expected_text: String,
        spoken_text: String,
    ) -> Result<SessionAnalysis, AssessmentError> {
        let aligner = self.aligner.clone();
        tokio::task::spawn_blocking(move || aligner.analyze(&expected_text, &spoken_text))
            .await
            .map_err(|e| AssessmentError::Worker(e.to_string()))
    }

    /// Transcribe `audio` and analyse it against `expected_text`
    pub async fn evaluate(
        &self,
        audio: Vec<u8>,
        expected_text: String,
    ) -> Result<Evaluation, AssessmentError> {
        let transcription = self.transcriber.transcribe(audio).await?;
        let analysis = self
            .analyze(expected_text, transcription.text.clone())
            .await?;

        info!(
            words = analysis.words.len(),
            accuracy = analysis.accuracy,
            "Read-aloud evaluated"
        );

        Ok(Evaluation {
            transcription,
            analysis,
        })
    }

    pub async fn colorize(&self, word: String) -> Result<ColorizedWord, AssessmentError> {
        let aligner = self.aligner.clone();
        tokio::task::spawn_blocking(move || {
            let phonemes = aligner.phonemes(&word);
            colorize(&word, phonemes)
        })
        .await
        .map_err(|e| AssessmentError::Worker(e.to_string()))
    }

    pub fn phonemizer_name(&self) -> &str {
        self.aligner.backend_name()
    }

    pub fn transcriber_name(&self) -> &str {
        self.transcriber.name()
    }
}
