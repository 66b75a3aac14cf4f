//! Next-phoneme selection
//!
//! Picks the phoneme with the highest error rate from a profile snapshot and
//! maps that rate onto a coarse support tier for lesson generation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PhonemeProfile;
use crate::assessment::round_to;

/// Phoneme recommended to learners with no history
pub const DEFAULT_PHONEME: &str = "b";

/// Lesson recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub phoneme: String,
    /// 1 = most support needed, 3 = least
    pub difficulty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Recommendation {
    /// Cold-start recommendation
    pub fn default_start() -> Self {
        Self {
            phoneme: DEFAULT_PHONEME.to_string(),
            difficulty: 1,
            error_rate: None,
            attempts: None,
            reason: Some("default".to_string()),
        }
    }
}

/// Support tier for an error rate: `> 0.6` is 1, `> 0.3` is 2, otherwise 3
pub fn difficulty_for(error_rate: f64) -> u8 {
    if error_rate > 0.6 {
        1
    } else if error_rate > 0.3 {
        2
    } else {
        3
    }
}

/// Recommend the next phoneme to practise.
///
/// Highest error rate wins; equal rates prefer the phoneme with more attempts,
/// then the alphabetically first key. An absent or empty profile yields
/// [`Recommendation::default_start`].
pub fn select_next(profile: Option<&PhonemeProfile>) -> Recommendation {
    let Some(profile) = profile.filter(|p| !p.is_empty()) else {
        return Recommendation::default_start();
    };

    let best = profile
        .iter()
        .map(|(phoneme, stats)| (phoneme, stats.error_rate(), stats.attempts.max(1)))
        .min_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| a.0.cmp(&b.0))
        });

    let Some((phoneme, error_rate, attempts)) = best else {
        return Recommendation::default_start();
    };

    let difficulty = difficulty_for(error_rate);
    debug!(
        phoneme,
        error_rate,
        attempts,
        difficulty,
        candidates = profile.len(),
        "Next phoneme selected"
    );

    Recommendation {
        phoneme: phoneme.to_string(),
        difficulty,
        error_rate: Some(round_to(error_rate, 2)),
        attempts: Some(attempts),
        reason: None,
    }
}
