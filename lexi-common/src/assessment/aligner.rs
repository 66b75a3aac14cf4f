//! Positional word alignment and error classification
//!
//! Word *i* of the expected text is compared with word *i* of the spoken text.
//! There is no insertion/deletion handling: an extra or dropped word shifts
//! every later comparison. Missing spoken positions compare against `""`.

use tracing::debug;

use super::similarity::similarity;
use super::{leading_phoneme, round_to, ErrorType, SessionAnalysis, WordRecord};
use crate::phonemizer::{phonemes_or_raw, Phonemizer};

/// Similarity above which a wrong word counts as a near miss
pub const SIMILAR_THRESHOLD: f64 = 0.6;

/// Align `spoken_text` against `expected_text` and classify every word.
///
/// Both texts are lower-cased and split on whitespace; punctuation is kept.
/// Never fails: phonemizer errors degrade to raw-word comparison.
pub fn analyze(
    phonemizer: &dyn Phonemizer,
    expected_text: &str,
    spoken_text: &str,
) -> SessionAnalysis {
    let expected_lower = expected_text.to_lowercase();
    let spoken_lower = spoken_text.to_lowercase();
    let spoken_words: Vec<&str> = spoken_lower.split_whitespace().collect();

    let words: Vec<WordRecord> = expected_lower
        .split_whitespace()
        .enumerate()
        .map(|(i, expected)| {
            let spoken = spoken_words.get(i).copied().unwrap_or("");
            score_word(phonemizer, expected, spoken)
        })
        .collect();

    let correct = words.iter().filter(|w| w.error_type.is_correct()).count();
    let accuracy = round_to(correct as f64 / words.len().max(1) as f64, 3);

    debug!(
        expected_words = words.len(),
        spoken_words = spoken_words.len(),
        correct,
        accuracy,
        "Utterance analyzed"
    );

    SessionAnalysis {
        words,
        accuracy,
        expected_text: expected_text.to_string(),
        spoken_text: spoken_text.to_string(),
    }
}

/// Classify one aligned position.
///
/// Priority: exact match, then near miss by phonemes, then omission,
/// otherwise a plain substitution.
pub fn classify(expected: &str, spoken: &str, similarity: f64) -> ErrorType {
    if expected == spoken {
        ErrorType::Correct
    } else if similarity > SIMILAR_THRESHOLD {
        ErrorType::SubstitutionSimilar
    } else if spoken.is_empty() {
        ErrorType::Omission
    } else {
        ErrorType::Substitution
    }
}

fn score_word(phonemizer: &dyn Phonemizer, expected: &str, spoken: &str) -> WordRecord {
    let expected_phonemes = phonemes_or_raw(phonemizer, expected);
    let spoken_phonemes = phonemes_or_raw(phonemizer, spoken);
    let sim = similarity(&expected_phonemes, &spoken_phonemes);
    let error_type = classify(expected, spoken, sim);

    let mistaken_phoneme = if error_type.is_correct() {
        None
    } else {
        leading_phoneme(&expected_phonemes)
    };
    let substituted_with = match error_type {
        ErrorType::Substitution | ErrorType::SubstitutionSimilar => {
            leading_phoneme(&spoken_phonemes)
        }
        _ => None,
    };

    WordRecord {
        expected: expected.to_string(),
        spoken: spoken.to_string(),
        expected_phonemes,
        spoken_phonemes,
        similarity: round_to(sim, 3),
        error_type,
        mistaken_phoneme,
        substituted_with,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonemizer::{GraphemePhonemizer, PhonemizeError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OfflinePhonemizer {
        calls: AtomicUsize,
    }

    impl Phonemizer for OfflinePhonemizer {
        fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(PhonemizeError::Unsupported(word.to_string()))
        }

        fn name(&self) -> &str {
            "offline"
        }
    }

    #[test]
    fn test_identical_utterance_is_all_correct() {
        let result = analyze(&GraphemePhonemizer, "bat dog", "bat dog");

        assert_eq!(result.words.len(), 2);
        assert!(result.words.iter().all(|w| w.error_type == ErrorType::Correct));
        assert_eq!(result.accuracy, 1.0);
        assert_eq!(result.words[0].similarity, 1.0);
        assert_eq!(result.words[0].mistaken_phoneme, None);
    }

    #[test]
    fn test_missing_word_is_omission() {
        let result = analyze(&GraphemePhonemizer, "bat dog", "bat");

        assert_eq!(result.words[0].error_type, ErrorType::Correct);
        assert_eq!(result.words[1].spoken, "");
        assert_eq!(result.words[1].spoken_phonemes, "");
        assert_eq!(result.words[1].similarity, 0.0);
        assert_eq!(result.words[1].error_type, ErrorType::Omission);
        assert_eq!(result.words[1].mistaken_phoneme.as_deref(), Some("d"));
        assert_eq!(result.words[1].substituted_with, None);
        assert_eq!(result.accuracy, 0.5);
    }

    #[test]
    fn test_dissimilar_word_is_substitution() {
        let result = analyze(&GraphemePhonemizer, "bat dog", "bat cat");

        let dog = &result.words[1];
        assert!(dog.similarity <= SIMILAR_THRESHOLD);
        assert_eq!(dog.error_type, ErrorType::Substitution);
        assert_eq!(dog.mistaken_phoneme.as_deref(), Some("d"));
        assert_eq!(dog.substituted_with.as_deref(), Some("k"));
    }

    #[test]
    fn test_close_word_is_similar_substitution() {
        // "b a t" vs "d a t" share " a t": 2 * 4 / 10
        let result = analyze(&GraphemePhonemizer, "bat", "dat");

        assert_eq!(result.words[0].similarity, 0.8);
        assert_eq!(result.words[0].error_type, ErrorType::SubstitutionSimilar);
        assert_eq!(result.words[0].substituted_with.as_deref(), Some("d"));
    }

    #[test]
    fn test_case_is_normalized_but_punctuation_is_not() {
        let result = analyze(&GraphemePhonemizer, "The Bat.", "the bat");

        assert_eq!(result.words[0].error_type, ErrorType::Correct);
        assert_ne!(result.words[1].error_type, ErrorType::Correct);
        assert_eq!(result.expected_text, "The Bat.");
    }

    #[test]
    fn test_extra_spoken_word_shifts_alignment() {
        let result = analyze(&GraphemePhonemizer, "bat dog", "a bat dog");

        assert!(result.words.iter().all(|w| !w.error_type.is_correct()));
        assert_eq!(result.accuracy, 0.0);
    }

    #[test]
    fn test_empty_expected_text() {
        let result = analyze(&GraphemePhonemizer, "", "anything");

        assert!(result.words.is_empty());
        assert_eq!(result.accuracy, 0.0);
    }

    #[test]
    fn test_phonemizer_failure_degrades_to_raw_words() {
        let phonemizer = OfflinePhonemizer {
            calls: AtomicUsize::new(0),
        };
        let result = analyze(&phonemizer, "bat dog", "bat");

        assert_eq!(result.words[0].expected_phonemes, "bat");
        assert_eq!(result.words[0].error_type, ErrorType::Correct);
        assert_eq!(result.words[1].expected_phonemes, "dog");
        assert_eq!(result.words[1].error_type, ErrorType::Omission);
        // The empty spoken word never reaches the backend
        assert_eq!(phonemizer.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_accuracy_matches_correct_fraction() {
        let result = analyze(&GraphemePhonemizer, "one two three", "one too three");

        let expected = round_to(result.correct_count() as f64 / 3.0, 3);
        assert_eq!(result.accuracy, expected);
        assert_eq!(result.accuracy, 0.667);
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("bat", "bat", 0.0), ErrorType::Correct);
        assert_eq!(classify("bat", "", 0.9), ErrorType::SubstitutionSimilar);
        assert_eq!(classify("bat", "", 0.6), ErrorType::Omission);
        assert_eq!(classify("bat", "cow", 0.6), ErrorType::Substitution);
    }
}
