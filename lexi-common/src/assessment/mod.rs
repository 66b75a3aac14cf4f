//! Pronunciation assessment
//!
//! Compares an expected text with a transcribed utterance word by word and
//! classifies each position. See [`aligner::analyze`] for the alignment rules
//! and [`similarity::similarity`] for the phoneme scorer.

pub mod aligner;
pub mod similarity;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::phonemizer::{phonemes_or_raw, Phonemizer};

pub use aligner::{analyze, classify, SIMILAR_THRESHOLD};
pub use similarity::similarity;

/// Outcome of comparing one expected word with what was spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Correct,
    /// Wrong word, but its phonemes are close (e.g. b/d swaps)
    SubstitutionSimilar,
    /// Nothing was spoken at this position
    Omission,
    Substitution,
}

impl ErrorType {
    pub fn is_correct(&self) -> bool {
        matches!(self, ErrorType::Correct)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Correct => "correct",
            ErrorType::SubstitutionSimilar => "substitution_similar",
            ErrorType::Omission => "omission",
            ErrorType::Substitution => "substitution",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis of a single aligned word position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub expected: String,
    /// Empty when the utterance ran out of words
    #[serde(default)]
    pub spoken: String,
    #[serde(default)]
    pub expected_phonemes: String,
    #[serde(default)]
    pub spoken_phonemes: String,
    /// Phoneme similarity, rounded to 3 decimals; `null` reads as 0
    #[serde(
        default,
        alias = "phoneme_similarity",
        deserialize_with = "null_as_zero"
    )]
    pub similarity: f64,
    pub error_type: ErrorType,
    /// Leading expected phoneme of a mispronounced word
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistaken_phoneme: Option<String>,
    /// Leading spoken phoneme that replaced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_with: Option<String>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Word-by-word analysis of one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub words: Vec<WordRecord>,
    /// Fraction of words marked correct, rounded to 3 decimals
    pub accuracy: f64,
    pub expected_text: String,
    pub spoken_text: String,
}

impl SessionAnalysis {
    pub fn correct_count(&self) -> usize {
        self.words
            .iter()
            .filter(|w| w.error_type.is_correct())
            .count()
    }
}

/// Assessment service object
///
/// Holds the phonemizer backend chosen at startup so handlers can share one
/// instance instead of loading a backend per request.
#[derive(Clone)]
pub struct WordAligner {
    phonemizer: Arc<dyn Phonemizer>,
}

impl WordAligner {
    pub fn new(phonemizer: Arc<dyn Phonemizer>) -> Self {
        Self { phonemizer }
    }

    /// Align and classify `spoken_text` against `expected_text`
    pub fn analyze(&self, expected_text: &str, spoken_text: &str) -> SessionAnalysis {
        analyze(self.phonemizer.as_ref(), expected_text, spoken_text)
    }

    /// Phonemes for one word, falling back to the word itself
    pub fn phonemes(&self, word: &str) -> String {
        phonemes_or_raw(self.phonemizer.as_ref(), word)
    }

    pub fn backend_name(&self) -> &str {
        self.phonemizer.name()
    }
}

/// First phoneme token of a phoneme string, lower-cased
pub fn leading_phoneme(phonemes: &str) -> Option<String> {
    phonemes.split_whitespace().next().map(str::to_lowercase)
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
