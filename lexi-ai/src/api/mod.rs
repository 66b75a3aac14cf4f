//! HTTP API handlers for lexi-ai

pub mod asr;
pub mod health;
pub mod phonemes;

pub use asr::asr_routes;
pub use health::health_routes;
pub use phonemes::phoneme_routes;
