//! Phoneme difficulty profiles
//!
//! A profile maps a phoneme key to how often words starting with it were
//! attempted and how often they came out wrong. Aggregating a submission
//! produces a profile-shaped delta; stores add deltas to what they hold.

pub mod selector;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assessment::{leading_phoneme, SessionAnalysis, WordRecord};

pub use selector::{difficulty_for, select_next, Recommendation, DEFAULT_PHONEME};

fn one() -> u32 {
    1
}

/// Attempt/error counters for one phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeStats {
    /// Older error-only profiles omit this; treat them as one attempt
    #[serde(default = "one")]
    pub attempts: u32,
    #[serde(default)]
    pub errors: u32,
}

impl PhonemeStats {
    /// `errors / max(1, attempts)`
    pub fn error_rate(&self) -> f64 {
        self.errors as f64 / self.attempts.max(1) as f64
    }
}

/// Per-learner phoneme statistics, also used as an additive delta
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhonemeProfile {
    phonemes: BTreeMap<String, PhonemeStats>,
}

impl PhonemeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt at `phoneme`, and one error unless `correct`
    pub fn record(&mut self, phoneme: &str, correct: bool) {
        let stats = self
            .phonemes
            .entry(phoneme.to_string())
            .or_insert(PhonemeStats {
                attempts: 0,
                errors: 0,
            });
        stats.attempts += 1;
        if !correct {
            stats.errors += 1;
        }
    }

    /// Add another profile's counters into this one
    pub fn merge(&mut self, other: &PhonemeProfile) {
        for (phoneme, delta) in &other.phonemes {
            let stats = self
                .phonemes
                .entry(phoneme.clone())
                .or_insert(PhonemeStats {
                    attempts: 0,
                    errors: 0,
                });
            stats.attempts += delta.attempts;
            stats.errors += delta.errors;
        }
    }

    /// Insert counters directly, replacing any existing entry
    pub fn insert(&mut self, phoneme: impl Into<String>, stats: PhonemeStats) {
        self.phonemes.insert(phoneme.into(), stats);
    }

    pub fn get(&self, phoneme: &str) -> Option<&PhonemeStats> {
        self.phonemes.get(phoneme)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PhonemeStats)> {
        self.phonemes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.phonemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    pub fn total_errors(&self) -> u64 {
        self.phonemes.values().map(|s| s.errors as u64).sum()
    }
}

impl FromIterator<(String, PhonemeStats)> for PhonemeProfile {
    fn from_iter<I: IntoIterator<Item = (String, PhonemeStats)>>(iter: I) -> Self {
        Self {
            phonemes: iter.into_iter().collect(),
        }
    }
}

/// Anything exposing a list of analysed words
pub trait WordBatch {
    fn words(&self) -> &[WordRecord];
}

impl WordBatch for SessionAnalysis {
    fn words(&self) -> &[WordRecord] {
        &self.words
    }
}

impl WordBatch for [WordRecord] {
    fn words(&self) -> &[WordRecord] {
        self
    }
}

impl WordBatch for Vec<WordRecord> {
    fn words(&self) -> &[WordRecord] {
        self
    }
}

/// Build a profile delta from one or more analysed batches.
///
/// Every word counts as an attempt on the first token of its expected
/// phonemes; words not marked correct also count as an error. Words with no
/// phoneme token are skipped. Applying the same batch twice counts it twice.
pub fn aggregate<'a, B, I>(blocks: I) -> PhonemeProfile
where
    B: WordBatch + ?Sized + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let mut delta = PhonemeProfile::new();
    for block in blocks {
        for word in block.words() {
            if let Some(key) = leading_phoneme(&word.expected_phonemes) {
                delta.record(&key, word.error_type.is_correct());
            }
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::ErrorType;

    fn word(expected_phonemes: &str, error_type: ErrorType) -> WordRecord {
        WordRecord {
            expected: String::new(),
            spoken: String::new(),
            expected_phonemes: expected_phonemes.to_string(),
            spoken_phonemes: String::new(),
            similarity: 0.0,
            error_type,
            mistaken_phoneme: None,
            substituted_with: None,
        }
    }

    #[test]
    fn test_counts_attempts_and_errors_across_blocks() {
        let first = vec![
            word("b æ t", ErrorType::Substitution),
            word("b ɔ l", ErrorType::Correct),
        ];
        let second = vec![word("B ʊ k", ErrorType::Omission)];

        let delta = aggregate([&first, &second]);

        let b = delta.get("b").unwrap();
        assert_eq!(b.attempts, 3);
        assert_eq!(b.errors, 2);
        assert!((b.error_rate() - 0.667).abs() < 0.001);
    }

    #[test]
    fn test_skips_words_without_phonemes() {
        let block = vec![word("", ErrorType::Substitution), word("   ", ErrorType::Omission)];
        assert!(aggregate([&block]).is_empty());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = aggregate([&vec![
            word("d ɔ g", ErrorType::Substitution),
            word("b æ t", ErrorType::Correct),
        ]]);
        let b = aggregate([&vec![word("d ɪ g", ErrorType::Correct)]]);

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab, ba);
        assert_eq!(ab.get("d"), Some(&PhonemeStats { attempts: 2, errors: 1 }));
        assert_eq!(ab.total_errors(), 1);
    }

    #[test]
    fn test_aggregates_session_analyses() {
        let analysis = SessionAnalysis {
            words: vec![word("ʃ ɪ p", ErrorType::SubstitutionSimilar)],
            accuracy: 0.0,
            expected_text: "ship".to_string(),
            spoken_text: "sip".to_string(),
        };
        let delta = aggregate([&analysis]);
        assert_eq!(delta.get("ʃ"), Some(&PhonemeStats { attempts: 1, errors: 1 }));
    }

    #[test]
    fn test_legacy_profile_json_defaults_attempts() {
        let profile: PhonemeProfile =
            serde_json::from_str(r#"{"b": {"errors": 4}, "d": {"attempts": 5, "errors": 1}}"#)
                .unwrap();
        assert_eq!(profile.get("b"), Some(&PhonemeStats { attempts: 1, errors: 4 }));
        assert_eq!(profile.len(), 2);

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["d"]["attempts"], 5);
    }
}
