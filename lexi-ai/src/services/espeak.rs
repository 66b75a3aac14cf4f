//! espeak-ng phonemizer backend
//!
//! Runs `espeak-ng -q --ipa` once per word and reshapes its output into
//! space-separated IPA tokens with stress marks removed.

use lexi_common::config::PhonemizerConfig;
use lexi_common::phonemizer::{PhonemizeError, Phonemizer};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Separator requested from espeak between phonemes
const PHONEME_SEP: char = '_';

const STRESS_MARKS: &[char] = &['ˈ', 'ˌ'];

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Subprocess-backed IPA phonemizer
#[derive(Debug, Clone)]
pub struct EspeakPhonemizer {
    program: String,
    voice: String,
    timeout: Duration,
}

impl EspeakPhonemizer {
    pub fn new(program: impl Into<String>, voice: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            voice: voice.into(),
            timeout,
        }
    }

    pub fn from_config(config: &PhonemizerConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.voice.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// Check that the program starts and exits cleanly
    pub fn probe(&self) -> Result<(), PhonemizeError> {
        self.run(&["--version"]).map(|_| ())
    }

    fn run(&self, args: &[&str]) -> Result<String, PhonemizeError> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PhonemizeError::Timeout(self.timeout));
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        let stdout = read_pipe(&mut child, Pipe::Stdout)?;
        if !status.success() {
            let stderr = read_pipe(&mut child, Pipe::Stderr)?;
            return Err(PhonemizeError::Command {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

enum Pipe {
    Stdout,
    Stderr,
}

fn read_pipe(child: &mut Child, pipe: Pipe) -> Result<String, PhonemizeError> {
    let mut buf = Vec::new();
    match pipe {
        Pipe::Stdout => {
            if let Some(out) = child.stdout.as_mut() {
                out.read_to_end(&mut buf)?;
            }
        }
        Pipe::Stderr => {
            if let Some(err) = child.stderr.as_mut() {
                err.read_to_end(&mut buf)?;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Turn `b_ˈæ_t` style output into `b æ t`
pub fn normalize_ipa(raw: &str) -> String {
    raw.chars()
        .filter(|c| !STRESS_MARKS.contains(c))
        .collect::<String>()
        .split(|c: char| c == PHONEME_SEP || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Command line for one word; `--` keeps a leading dash from reading as a flag
fn phonemize_args<'a>(sep: &'a str, voice: &'a str, word: &'a str) -> [&'a str; 7] {
    ["-q", "--ipa", sep, "-v", voice, "--", word]
}

impl Phonemizer for EspeakPhonemizer {
    fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
        let sep = format!("--sep={}", PHONEME_SEP);
        let raw = self.run(&phonemize_args(&sep, &self.voice, word))?;

        let phonemes = normalize_ipa(&raw);
        if phonemes.is_empty() {
            return Err(PhonemizeError::EmptyOutput(word.to_string()));
        }
        Ok(phonemes)
    }

    fn name(&self) -> &str {
        "espeak"
    }
}
