//! Backend construction from `config.toml`

use lexi_common::config::{PhonemizerBackend, PhonemizerConfig, TranscriberConfig};
use lexi_common::phonemizer::{GraphemePhonemizer, Phonemizer};
use std::sync::Arc;
use tracing::{info, warn};

use crate::services::{EspeakPhonemizer, TranscribeError, Transcriber, WhisperHttpClient};

/// Build the configured phonemizer.
///
/// An espeak backend that fails its startup probe is replaced by the grapheme
/// backend so the service still scores utterances.
pub fn build_phonemizer(config: &PhonemizerConfig) -> Arc<dyn Phonemizer> {
    match config.backend {
        PhonemizerBackend::Grapheme => {
            info!("Phonemizer: grapheme");
            Arc::new(GraphemePhonemizer::new())
        }
        PhonemizerBackend::Espeak => {
            let espeak = EspeakPhonemizer::from_config(config);
            match espeak.probe() {
                Ok(()) => {
                    info!(program = %config.program, voice = %config.voice, "Phonemizer: espeak");
                    Arc::new(espeak)
                }
                Err(e) => {
                    warn!(
                        program = %config.program,
                        error = %e,
                        "espeak unavailable, falling back to grapheme phonemizer"
                    );
                    Arc::new(GraphemePhonemizer::new())
                }
            }
        }
    }
}

pub fn build_transcriber(
    config: &TranscriberConfig,
) -> Result<Arc<dyn Transcriber>, TranscribeError> {
    let client = WhisperHttpClient::new(config)?;
    info!(endpoint = %client.endpoint(), language = %config.language, "Transcriber configured");
    Ok(Arc::new(client))
}
