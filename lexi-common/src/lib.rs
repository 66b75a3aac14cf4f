//! # LexiLift Common Library
//!
//! Shared code for the LexiLift services including:
//! - Pronunciation assessment (positional word alignment, phoneme similarity)
//! - Phoneme difficulty profiles and next-phoneme selection
//! - Phonemizer collaborator trait and the built-in grapheme backend
//! - Configuration loading
//! - Database bootstrap and lock retry

pub mod assessment;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod phonemizer;
pub mod profile;

pub use assessment::{ErrorType, SessionAnalysis, WordAligner, WordRecord};
pub use error::{Error, Result};
pub use phonemizer::{PhonemizeError, Phonemizer};
pub use profile::{PhonemeProfile, PhonemeStats, Recommendation, WordBatch};
