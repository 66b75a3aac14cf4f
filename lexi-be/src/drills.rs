//! Practice word bank
//!
//! Short word lists keyed by target phoneme. Profile keys may be IPA symbols
//! (espeak) or spelling tokens (grapheme backend); both resolve to the same
//! list.

use rand::seq::SliceRandom;

/// Words per drill when the request does not say
pub const DEFAULT_DRILL_SIZE: usize = 5;

/// Upper bound on words per drill
pub const MAX_DRILL_SIZE: usize = 20;

const WORD_BANK: &[(&str, &[&str])] = &[
    (
        "b",
        &[
            "ball", "bat", "book", "bag", "bell", "boy", "blue", "bird", "baby", "boat",
            "bed", "back", "banana", "bread", "bone", "bubble", "break", "basket", "bottle",
            "button", "build", "busy", "bright", "brown", "brush", "blink", "block", "bake",
            "bench", "burn", "barn", "branch", "beach", "breeze", "broom", "bucket",
            "borrow", "battle", "beetle", "bunny", "bridge", "bundle", "badge", "bamboo",
            "barrel", "biscuit", "blossom",
        ],
    ),
    (
        "d",
        &[
            "dog", "day", "door", "doll", "desk", "duck", "dance", "dark", "deep", "dirt",
            "done", "dig", "dare", "dish", "dream", "drive", "drop", "drum", "dive", "dust",
            "dinner", "doctor", "dragon", "diamond", "doodle", "daisy", "donkey", "dart",
            "danger", "dawn", "drain", "drip", "drift", "draft", "drapes", "double",
            "dolphin", "dimple", "dune",
        ],
    ),
    (
        "sh",
        &[
            "shark", "shoe", "ship", "shop", "shell", "shine", "shout", "shake", "shadow",
            "sheet", "shy", "share", "shrink", "shrimp", "sheep", "sharp", "shelter",
            "shoulder", "sugar", "shovel", "shower", "shield", "short", "shape", "shimmer",
            "shuffle", "shutter", "shampoo", "shepherd", "shore", "shrug", "shiny",
            "shimmering", "shadowy", "shallow",
        ],
    ),
    (
        "r",
        &[
            "rain", "run", "red", "ride", "rope", "river", "room", "rock", "ring", "race",
            "rainbow", "rabbit", "radio", "ready", "root", "roll", "road", "rocket",
            "reach", "read", "rush", "rattle", "remote", "ribbon", "ruler", "robot",
            "round", "rough", "rumble", "reindeer", "reason", "riddle", "ranch", "ripple",
            "rapid", "robin", "rose",
        ],
    ),
    (
        "th",
        &[
            "think", "thumb", "thin", "thorn", "thank", "thread", "three", "thigh",
            "thunder", "thick", "thirsty", "throat", "theme", "thief", "therapy", "thirty",
            "thousand", "thaw", "thought", "thrive", "threat", "thistle",
        ],
    ),
    (
        "k",
        &[
            "cat", "cake", "king", "kite", "kid", "key", "car", "cup", "cold", "kick",
            "kind", "cook", "care", "corner", "candle", "camel", "camera", "color", "candy",
            "cave", "clock", "cloud", "clap", "clip", "clean", "climb", "crack", "crow",
            "cream", "creek", "crisp", "crown", "crocodile",
        ],
    ),
    (
        "g",
        &[
            "go", "game", "gum", "gate", "gold", "good", "gift", "girl", "glad", "glass",
            "glow", "green", "grape", "grass", "grow", "group", "great", "globe", "grin",
            "grip", "grain", "ground", "gorilla", "giraffe", "gown", "garden", "gather",
            "gallop", "gasp",
        ],
    ),
];

const ALIASES: &[(&str, &str)] = &[
    ("ʃ", "sh"),
    ("ɹ", "r"),
    ("ɾ", "r"),
    ("θ", "th"),
    ("ð", "th"),
    ("ɡ", "g"),
    ("c", "k"),
];

/// Word bank key for a profile phoneme, if there is one
pub fn bank_key(phoneme: &str) -> Option<&'static str> {
    let phoneme = phoneme.trim().to_lowercase();
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == phoneme)
        .map(|(_, key)| *key)
        .unwrap_or(phoneme.as_str());

    WORD_BANK
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(k, _)| *k)
}

/// Phonemes with a word list
pub fn supported_phonemes() -> Vec<&'static str> {
    WORD_BANK.iter().map(|(k, _)| *k).collect()
}

/// Random sample of up to `count` distinct words for `phoneme`.
///
/// `count` is clamped to `1..=MAX_DRILL_SIZE`. Unknown phonemes give `None`.
pub fn drill_words(phoneme: &str, count: usize) -> Option<Vec<String>> {
    let key = bank_key(phoneme)?;
    let words = WORD_BANK
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, words)| *words)?;

    let count = count.clamp(1, MAX_DRILL_SIZE);
    let mut rng = rand::thread_rng();
    Some(
        words
            .choose_multiple(&mut rng, count)
            .map(|w| w.to_string())
            .collect(),
    )
}
