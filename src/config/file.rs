//! TOML configuration file loading
//!
//! Supports `~/.config/voxrelay/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VoxrelayConfigFile {
    /// Relay server connection
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for STT services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Relay server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Base URL, e.g. `http://192.168.1.20:3000`
    pub url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// STT request timeout in seconds
    pub stt_timeout_secs: Option<u64>,

    /// Floor for the speech energy threshold
    pub min_energy: Option<f32>,

    /// Ambient noise sampling before each listen, in seconds (0 disables)
    pub calibration_secs: Option<f64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub deepgram: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VoxrelayConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> VoxrelayConfigFile {
    config_file_path().map_or_else(VoxrelayConfigFile::default, |path| load_from_path(&path))
}

/// Load a config file from `path`, falling back to defaults on any failure
pub fn load_from_path(path: &Path) -> VoxrelayConfigFile {
    if !path.exists() {
        return VoxrelayConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VoxrelayConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VoxrelayConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voxrelay/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voxrelay").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nurl = \"http://10.0.0.5:3000\"").unwrap();

        let fc = load_from_path(file.path());
        assert_eq!(fc.server.url.as_deref(), Some("http://10.0.0.5:3000"));
        assert!(fc.server.timeout_secs.is_none());
        assert!(fc.voice.stt_provider.is_none());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nurl = ").unwrap();

        let fc = load_from_path(file.path());
        assert!(fc.server.url.is_none());
    }

    #[test]
    fn test_missing_file() {
        let fc = load_from_path(Path::new("/nonexistent/voxrelay/config.toml"));
        assert!(fc.api_keys.openai.is_none());
    }
}
