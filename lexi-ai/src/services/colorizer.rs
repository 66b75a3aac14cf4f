//! Grapheme colouring for reading practice
//!
//! Gives every letter of a word a display colour from a fixed cycle, alongside
//! the word's phonemes, so a reading view can tint letters consistently.

use serde::{Deserialize, Serialize};

/// Display colours assigned to graphemes in order
pub const COLOR_CYCLE: [&str; 5] = ["#4F46E5", "#FB923C", "#10B981", "#EF4444", "#F59E0B"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorizedWord {
    pub word: String,
    pub graphemes: Vec<String>,
    /// Same length as `graphemes`
    pub colors: Vec<String>,
    pub phonemes: String,
}

/// One grapheme per character, coloured by position
pub fn colorize(word: &str, phonemes: String) -> ColorizedWord {
    let graphemes: Vec<String> = word.chars().map(String::from).collect();
    let colors = (0..graphemes.len())
        .map(|i| COLOR_CYCLE[i % COLOR_CYCLE.len()].to_string())
        .collect();

    ColorizedWord {
        word: word.to_string(),
        graphemes,
        colors,
        phonemes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_cycle() {
        let c = colorize("shadows", "ʃ æ d oʊ z".to_string());
        assert_eq!(c.graphemes.len(), 7);
        assert_eq!(c.colors.len(), 7);
        assert_eq!(c.colors[0], "#4F46E5");
        assert_eq!(c.colors[5], "#4F46E5");
        assert_eq!(c.colors[6], "#FB923C");
        assert_eq!(c.graphemes[0], "s");
    }

    #[test]
    fn test_empty_word() {
        let c = colorize("", String::new());
        assert!(c.graphemes.is_empty());
        assert!(c.colors.is_empty());
    }
}
