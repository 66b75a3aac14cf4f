//! Grapheme-to-phoneme collaborator
//!
//! The assessment engine never converts spelling to sound itself. It asks a
//! [`Phonemizer`] for each word and, when the backend fails, falls back to the
//! raw word so that scoring degrades instead of aborting.

use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Phonemizer backend errors
#[derive(Debug, Error)]
pub enum PhonemizeError {
    /// Backend returned nothing usable for a non-empty word
    #[error("No phonemes produced for {0:?}")]
    EmptyOutput(String),

    /// Input the backend cannot handle (e.g. no letters at all)
    #[error("Unsupported input: {0:?}")]
    Unsupported(String),

    /// Backend process could not be started
    #[error("Failed to start phonemizer: {0}")]
    Spawn(#[from] std::io::Error),

    /// Backend process exited unsuccessfully
    #[error("Phonemizer exited with code {code:?}: {stderr}")]
    Command { code: Option<i32>, stderr: String },

    /// Backend exceeded its latency budget
    #[error("Phonemizer timed out after {0:?}")]
    Timeout(Duration),
}

/// Converts a single word into a space-separated phoneme string
pub trait Phonemizer: Send + Sync {
    fn phonemize(&self, word: &str) -> Result<String, PhonemizeError>;

    /// Backend name for logs and health output
    fn name(&self) -> &str;
}

/// Phonemize `word`, substituting the raw word on any backend failure.
///
/// The empty word maps to the empty string without consulting the backend.
pub fn phonemes_or_raw(phonemizer: &dyn Phonemizer, word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    match phonemizer.phonemize(word) {
        Ok(phonemes) if !phonemes.trim().is_empty() => phonemes.trim().to_string(),
        Ok(_) => {
            warn!(
                word,
                backend = phonemizer.name(),
                "Phonemizer returned empty output, using raw word"
            );
            word.to_string()
        }
        Err(e) => {
            warn!(
                word,
                backend = phonemizer.name(),
                error = %e,
                "Phonemizer failed, using raw word"
            );
            word.to_string()
        }
    }
}

/// Spelling-based phonemizer
///
/// Emits one token per letter, folding common English digraphs (`sh`, `th`,
/// `ch`, `ng`, `ph`, `wh`, `ck`) into a single token and mapping `c`/`q` to
/// `k`. Used when no speech backend is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemePhonemizer;

const DIGRAPHS: &[(&str, &str)] = &[
    ("sh", "sh"),
    ("th", "th"),
    ("ch", "ch"),
    ("ng", "ng"),
    ("ph", "f"),
    ("wh", "w"),
    ("ck", "k"),
];

impl GraphemePhonemizer {
    pub fn new() -> Self {
        Self
    }
}

impl Phonemizer for GraphemePhonemizer {
    fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
        let letters: Vec<char> = word
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphabetic())
            .collect();

        if letters.is_empty() {
            return Err(PhonemizeError::Unsupported(word.to_string()));
        }

        let mut tokens: Vec<String> = Vec::with_capacity(letters.len());
        let mut i = 0;
        while i < letters.len() {
            if i + 1 < letters.len() {
                let pair: String = letters[i..i + 2].iter().collect();
                if let Some((_, token)) = DIGRAPHS.iter().find(|(g, _)| *g == pair) {
                    tokens.push((*token).to_string());
                    i += 2;
                    continue;
                }
            }

            let token = match letters[i] {
                'c' | 'q' => "k".to_string(),
                other => other.to_string(),
            };
            tokens.push(token);
            i += 1;
        }

        Ok(tokens.join(" "))
    }

    fn name(&self) -> &str {
        "grapheme"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPhonemizer;

    impl Phonemizer for BrokenPhonemizer {
        fn phonemize(&self, _word: &str) -> Result<String, PhonemizeError> {
            Err(PhonemizeError::Timeout(Duration::from_millis(10)))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_grapheme_tokens() {
        let p = GraphemePhonemizer::new();
        assert_eq!(p.phonemize("bat").unwrap(), "b a t");
        assert_eq!(p.phonemize("Cat").unwrap(), "k a t");
        assert_eq!(p.phonemize("ship").unwrap(), "sh i p");
        assert_eq!(p.phonemize("think").unwrap(), "th i n k");
        assert_eq!(p.phonemize("duck").unwrap(), "d u k");
        assert_eq!(p.phonemize("phone").unwrap(), "f o n e");
    }

    #[test]
    fn test_grapheme_skips_punctuation() {
        let p = GraphemePhonemizer::new();
        assert_eq!(p.phonemize("dog,").unwrap(), "d o g");
        assert!(matches!(
            p.phonemize("42!"),
            Err(PhonemizeError::Unsupported(_))
        ));
    }

    #[test]
    fn test_fallback_to_raw_word() {
        assert_eq!(phonemes_or_raw(&BrokenPhonemizer, "bat"), "bat");
    }

    #[test]
    fn test_empty_word_skips_backend() {
        assert_eq!(phonemes_or_raw(&BrokenPhonemizer, ""), "");
    }
}
