//! Configuration management for voxrelay
//!
//! Sources in priority order: environment, `config.toml`, built-in defaults.
//! The relay server URL defaults to [`DEFAULT_SERVER_URL`].

pub mod file;

use std::time::Duration;

use url::Url;

use crate::voice::{DEFAULT_MIN_ENERGY, SttProvider};
use crate::{Error, Result};

use self::file::VoxrelayConfigFile;

/// Relay server used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CALIBRATION_SECS: f64 = 1.0;

/// voxrelay configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay server connection
    pub server: ServerConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Relay server connection
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL (host:port, plain HTTP)
    pub url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT backend
    pub stt_provider: SttProvider,

    /// STT model identifier
    pub stt_model: String,

    /// STT request timeout
    pub stt_timeout: Duration,

    /// Floor for the speech energy threshold
    pub min_energy: f32,

    /// Ambient noise sampled before each listen
    pub calibration: Duration,
}

/// API keys for STT services
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper)
    pub openai: Option<String>,

    /// `Deepgram` API key
    pub deepgram: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &self.openai.as_ref().map(|_| "<set>"))
            .field("deepgram", &self.deepgram.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment and config file
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is invalid
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if the server URL or STT provider is invalid
    pub fn from_sources(
        fc: VoxrelayConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let url = env("VOXRELAY_SERVER_URL")
            .or(fc.server.url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server = ServerConfig {
            url: validate_server_url(&url)?,
            timeout: Duration::from_secs(
                fc.server.timeout_secs.unwrap_or(DEFAULT_SERVER_TIMEOUT_SECS),
            ),
        };

        let stt_provider = env("VOXRELAY_STT_PROVIDER")
            .or(fc.voice.stt_provider)
            .map(|p| p.parse::<SttProvider>())
            .transpose()?
            .unwrap_or_default();

        let calibration_secs = fc
            .voice
            .calibration_secs
            .unwrap_or(DEFAULT_CALIBRATION_SECS);
        let calibration = Duration::try_from_secs_f64(calibration_secs).map_err(|_| {
            Error::Config(format!("invalid calibration_secs: {calibration_secs}"))
        })?;

        let voice = VoiceConfig {
            stt_provider,
            stt_model: env("VOXRELAY_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| stt_provider.default_model().to_string()),
            stt_timeout: Duration::from_secs(
                fc.voice.stt_timeout_secs.unwrap_or(DEFAULT_STT_TIMEOUT_SECS),
            ),
            min_energy: fc.voice.min_energy.unwrap_or(DEFAULT_MIN_ENERGY),
            calibration,
        };

        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY").or(fc.api_keys.openai),
            deepgram: env("DEEPGRAM_API_KEY").or(fc.api_keys.deepgram),
        };

        Ok(Self {
            server,
            voice,
            api_keys,
        })
    }

    /// Replace the server URL (e.g. from a CLI flag)
    ///
    /// # Errors
    ///
    /// Returns error if `url` is not a valid HTTP URL
    pub fn with_server_url(mut self, url: &str) -> Result<Self> {
        self.server.url = validate_server_url(url)?;
        Ok(self)
    }

    /// API key for the configured STT provider
    #[must_use]
    pub fn stt_api_key(&self) -> Option<&str> {
        match self.voice.stt_provider {
            SttProvider::Whisper => self.api_keys.openai.as_deref(),
            SttProvider::Deepgram => self.api_keys.deepgram.as_deref(),
        }
    }
}

/// Parse and normalize a relay server base URL
fn validate_server_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("invalid server URL {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "server URL must be http(s): {raw}"
        )));
    }
    if url.host_str().is_none() {
        return Err(Error::Config(format!("server URL has no host: {raw}")));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
