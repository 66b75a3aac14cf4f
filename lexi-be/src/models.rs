//! Request payloads and stored session records

use chrono::{DateTime, Utc};
use lexi_common::assessment::round_to;
use lexi_common::{WordBatch, WordRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Kind of assessment prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Word,
    Sentence,
}

/// One answered assessment prompt, already analysed by lexi-ai
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub expected_text: String,
    #[serde(default)]
    pub spoken_text: String,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub words: Vec<WordRecord>,
}

impl WordBatch for QuestionRecord {
    fn words(&self) -> &[WordRecord] {
        &self.words
    }
}

/// POST /assessment/submit body
///
/// A client-computed `overall_accuracy` is ignored; the server recomputes it.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
    pub user_id: String,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// Stored assessment session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub questions: Vec<QuestionRecord>,
    pub overall_accuracy: f64,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn new(submission: AssessmentSubmission) -> Self {
        let overall_accuracy = overall_accuracy(&submission.questions);
        Self {
            id: Uuid::new_v4(),
            user_id: submission.user_id,
            questions: submission.questions,
            overall_accuracy,
            created_at: Utc::now(),
        }
    }
}

/// Mean question accuracy rounded to 3 decimals; 0 for no questions
pub fn overall_accuracy(questions: &[QuestionRecord]) -> f64 {
    let total: f64 = questions.iter().map(|q| q.accuracy).sum();
    round_to(total / questions.len().max(1) as f64, 3)
}

fn default_level() -> u32 {
    1
}

/// POST /exercises/submit body
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseSubmission {
    pub user_id: String,
    /// e.g. "read_aloud" or "listen_write"
    pub exercise_type: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub expected_text: String,
    #[serde(default)]
    pub spoken_text: Option<String>,
    #[serde(default)]
    pub words: Option<Vec<WordRecord>>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

/// Stored exercise session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub user_id: String,
    pub exercise_type: String,
    pub level: u32,
    pub expected_text: String,
    pub spoken_text: Option<String>,
    pub words: Vec<WordRecord>,
    pub accuracy: Option<f64>,
    pub meta: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl ExerciseRecord {
    pub fn new(submission: ExerciseSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: submission.user_id,
            exercise_type: submission.exercise_type,
            level: submission.level,
            expected_text: submission.expected_text,
            spoken_text: submission.spoken_text,
            words: submission.words.unwrap_or_default(),
            accuracy: submission.accuracy,
            meta: submission.meta.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

impl WordBatch for ExerciseRecord {
    fn words(&self) -> &[WordRecord] {
        &self.words
    }
}

/// Average accuracy for one exercise type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub exercise_type: String,
    /// None when no session of this type reported an accuracy
    pub avg_accuracy: Option<f64>,
    pub count: i64,
}

/// Check a user id from a request
pub fn validate_user_id(user_id: &str) -> Result<(), String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }
    Ok(())
}

/// Check that a score lies in [0, 1]
pub fn validate_fraction(name: &str, value: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{} must be within [0, 1], got {}", name, value));
    }
    Ok(())
}

/// Check every word similarity in a batch
pub fn validate_words(words: &[WordRecord]) -> Result<(), String> {
    for word in words {
        validate_fraction("similarity", word.similarity)
            .map_err(|e| format!("word {:?}: {}", word.expected, e))?;
    }
    Ok(())
}
