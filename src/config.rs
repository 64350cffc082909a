//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\levelscout\config.toml
//! - macOS: ~/Library/Application Support/levelscout/config.toml
//! - Linux: ~/.config/levelscout/config.toml
//!
//! The config file is human-readable and editable. Loading never fails:
//! a missing or broken file falls back to defaults with a logged warning.
//! API keys may come from the file or from the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Per-dependency rate limits
    pub limits: LimitsConfig,

    /// Pipeline tunables
    pub pipeline: PipelineConfig,

    /// Metadata fetcher settings
    pub youtube: YouTubeConfig,

    /// Semantic extractor settings
    pub gemini: GeminiConfig,

    /// Authority lookup settings
    pub gdbrowser: GdBrowserConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// YouTube Data API v3 key
    pub youtube_api_key: Option<String>,

    /// Gemini API key
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Config value first, `YOUTUBE_API_KEY` env var as fallback.
    pub fn youtube_key(&self) -> Option<String> {
        self.youtube_api_key
            .clone()
            .or_else(|| std::env::var("YOUTUBE_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }

    /// Config value first, `GEMINI_API_KEY` env var as fallback.
    pub fn gemini_key(&self) -> Option<String> {
        self.gemini_api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}

/// Rate limits for one external dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyLimits {
    /// Requests admitted per one-minute window
    pub requests_per_minute: u32,

    /// Calls allowed in flight at once
    pub max_concurrent: u32,

    /// Minimum milliseconds between successive admissions (0 = none)
    pub min_interval_ms: u64,
}

impl Default for DependencyLimits {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            max_concurrent: 4,
            min_interval_ms: 0,
        }
    }
}

impl DependencyLimits {
    /// Spacing floor as a `Duration`, `None` when unset.
    pub fn min_interval(&self) -> Option<Duration> {
        (self.min_interval_ms > 0).then(|| Duration::from_millis(self.min_interval_ms))
    }
}

/// Per-dependency rate limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub youtube: DependencyLimits,
    pub gemini: DependencyLimits,
    pub gdbrowser: DependencyLimits,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            youtube: DependencyLimits {
                requests_per_minute: 60,
                max_concurrent: 4,
                min_interval_ms: 0,
            },
            gemini: DependencyLimits {
                requests_per_minute: 15,
                max_concurrent: 2,
                min_interval_ms: 0,
            },
            // GDBrowser is a fan-run service; space requests out even when
            // the reservoir has tokens.
            gdbrowser: DependencyLimits {
                requests_per_minute: 30,
                max_concurrent: 2,
                min_interval_ms: 1000,
            },
        }
    }
}

/// Pipeline tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Lookup attempts per candidate before treating it as a miss
    pub retry_attempts: u32,

    /// First retry delay in milliseconds; doubles per attempt
    pub retry_base_delay_ms: u64,

    /// Video references handled per inbound event; extras are dropped
    pub max_videos_per_event: usize,

    /// Optional cap on pattern-stage lookups (unset = unbounded)
    pub max_candidate_lookups: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_base_delay_ms: 500,
            max_videos_per_event: 3,
            max_candidate_lookups: None,
        }
    }
}

/// Metadata fetcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Data API base URL
    pub base_url: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }
}

/// Semantic extractor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Generative Language API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Description characters submitted to the model; the rest is dropped
    pub description_truncate_chars: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            description_truncate_chars: 1500,
        }
    }
}

/// Authority lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GdBrowserConfig {
    /// GDBrowser base URL
    pub base_url: String,
}

impl Default for GdBrowserConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gdbrowser.com".to_string(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("levelscout"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[limits.youtube]"));
        assert!(toml.contains("[limits.gdbrowser]"));
        assert!(toml.contains("[pipeline]"));
        assert!(toml.contains("[gemini]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.gemini_api_key = Some("test-key-123".to_string());
        config.limits.gdbrowser.requests_per_minute = 10;
        config.pipeline.max_candidate_lookups = Some(8);

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            parsed.credentials.gemini_api_key,
            Some("test-key-123".to_string())
        );
        assert_eq!(parsed.limits.gdbrowser.requests_per_minute, 10);
        assert_eq!(parsed.pipeline.max_candidate_lookups, Some(8));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[credentials]
youtube_api_key = "my-key"

[limits.gemini]
requests_per_minute = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified fields are set
        assert_eq!(
            config.credentials.youtube_api_key,
            Some("my-key".to_string())
        );
        assert_eq!(config.limits.gemini.requests_per_minute, 5);

        // Other fields use defaults
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.limits.gdbrowser.min_interval_ms, 1000);
        assert_eq!(config.pipeline.retry_attempts, 3);
    }

    #[test]
    fn test_min_interval_zero_means_none() {
        let limits = DependencyLimits {
            min_interval_ms: 0,
            ..Default::default()
        };
        assert!(limits.min_interval().is_none());

        let limits = DependencyLimits {
            min_interval_ms: 1500,
            ..Default::default()
        };
        assert_eq!(limits.min_interval(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_save_and_reload_via_tempdir() {
        // Exercise the serialize/parse cycle against a real file without
        // touching the user's config dir.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.gdbrowser.base_url = "http://localhost:9999".to_string();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let parsed: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.gdbrowser.base_url, "http://localhost:9999");
    }
}
