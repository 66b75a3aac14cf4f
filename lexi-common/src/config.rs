//! Configuration loading and root folder resolution
//!
//! Missing or broken configuration never stops a service: every loader falls
//! back to compiled defaults and logs a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "LEXI_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "lexilift.db";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub phonemizer: PhonemizerConfig,
    pub transcriber: TranscriberConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Which grapheme-to-phoneme backend the speech service loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhonemizerBackend {
    /// espeak-ng subprocess producing IPA
    #[default]
    Espeak,
    /// Built-in spelling-based tokens
    Grapheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhonemizerConfig {
    pub backend: PhonemizerBackend,
    pub program: String,
    pub voice: String,
    /// Per-word latency budget
    pub timeout_ms: u64,
}

impl Default for PhonemizerConfig {
    fn default() -> Self {
        Self {
            backend: PhonemizerBackend::Espeak,
            program: "espeak-ng".to_string(),
            voice: "en-us".to_string(),
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// whisper-compatible HTTP endpoint accepting raw audio
    pub endpoint: String,
    pub language: String,
    pub timeout_ms: u64,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/inference".to_string(),
            language: "en".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// `<config dir>/lexilift/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lexilift").join("config.toml"))
}

/// Parse a TOML config file, failing on missing file or bad syntax
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Loaded(PathBuf),
    Missing(Option<PathBuf>),
    Invalid(String),
}

impl ConfigSource {
    /// Report the outcome once a tracing subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigSource::Loaded(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Missing(Some(path)) => {
                info!("No config file at {}, using defaults", path.display())
            }
            ConfigSource::Missing(None) => {
                warn!("Could not determine config directory, using defaults")
            }
            ConfigSource::Invalid(reason) => warn!("{} - using defaults", reason),
        }
    }
}

/// Load configuration without logging, falling back to defaults on any problem.
///
/// Binaries call this before tracing is initialized so the configured log
/// level can take effect, then call [`ConfigSource::log`].
pub fn read_config_quietly(path: Option<&Path>) -> (TomlConfig, ConfigSource) {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => return (TomlConfig::default(), ConfigSource::Missing(None)),
    };

    if !path.exists() {
        return (TomlConfig::default(), ConfigSource::Missing(Some(path)));
    }

    match read_toml_config(&path) {
        Ok(config) => (config, ConfigSource::Loaded(path)),
        Err(e) => (TomlConfig::default(), ConfigSource::Invalid(e.to_string())),
    }
}

/// Load configuration, falling back to defaults on any problem.
///
/// `path` overrides the platform default location.
pub fn load_toml_config(path: Option<&Path>) -> TomlConfig {
    let (config, source) = read_config_quietly(path);
    source.log();
    config
}

/// Resolve the root folder.
///
/// Priority order:
/// 1. Command-line argument
/// 2. `LEXI_ROOT_FOLDER` environment variable
/// 3. `root_folder` in the TOML config
/// 4. OS-dependent default
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// OS-dependent default root folder
pub fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("lexilift"))
        .unwrap_or_else(|| PathBuf::from("./lexilift_data"))
}

/// Create the root folder if missing and return the database path inside it
pub fn prepare_root_folder(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        info!("Created root folder: {}", root.display());
    }
    Ok(root.join(DATABASE_FILE))
}
