//! Speech-side services

pub mod assessment;
pub mod colorizer;
pub mod espeak;
pub mod transcriber;

pub use assessment::{AssessmentError, AssessmentService, Evaluation};
pub use colorizer::{colorize, ColorizedWord, COLOR_CYCLE};
pub use espeak::EspeakPhonemizer;
pub use transcriber::{TranscribeError, Transcriber, Transcription, WhisperHttpClient};
