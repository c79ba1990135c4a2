//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `JESTER_CONFIG` environment variable
//! 3. `<user config dir>/jester/config.toml`
//! 4. Built-in defaults (fallback)
//!
//! Every field has a built-in default, so a partial TOML file is fine and a
//! missing file is never fatal unless it was named explicitly.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "JESTER_CONFIG";

/// Complete stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Ask the joke source to filter unsafe content
    pub safe_mode: bool,
    /// Narration and sound cues enabled
    pub audio_enabled: bool,
    /// EventBus channel capacity
    pub event_capacity: usize,
    /// Clear the network overlay automatically after this long (manual only if unset)
    pub network_auto_retry_ms: Option<u64>,
    pub speech: SpeechConfig,
    pub effects: EffectsConfig,
    pub timings: TimingConfig,
    pub logging: LoggingConfig,
    pub joke_api: JokeApiConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            safe_mode: true,
            audio_enabled: true,
            event_capacity: 100,
            network_auto_retry_ms: None,
            speech: SpeechConfig::default(),
            effects: EffectsConfig::default(),
            timings: TimingConfig::default(),
            logging: LoggingConfig::default(),
            joke_api: JokeApiConfig::default(),
        }
    }
}

/// Voice parameters for one kind of narration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub rate: f32,
    pub pitch: f32,
}

/// Narration voices per act
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub setup: Voice,
    pub guess: Voice,
    pub reveal: Voice,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            setup: Voice { rate: 0.9, pitch: 1.1 },
            guess: Voice { rate: 0.9, pitch: 1.0 },
            reveal: Voice { rate: 0.85, pitch: 1.0 },
        }
    }
}

/// Sound cue volumes (0.0 - 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub drumroll_volume: f32,
    pub fanfare_volume: f32,
    pub trombone_volume: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            drumroll_volume: 0.4,
            fanfare_volume: 0.5,
            trombone_volume: 0.5,
        }
    }
}

/// Dwell, pause and backoff durations of the performance loop (milliseconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub setup_dwell_ms: u64,
    pub drumroll_ms: u64,
    pub guess_hold_ms: u64,
    pub reveal_narration_delay_ms: u64,
    pub reveal_dwell_ms: u64,
    pub transition_pause_ms: u64,
    pub failure_backoff_ms: u64,
    pub retry_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            setup_dwell_ms: 3000,
            drumroll_ms: 2000,
            guess_hold_ms: 2000,
            reveal_narration_delay_ms: 500,
            reveal_dwell_ms: 3000,
            transition_pause_ms: 1000,
            failure_backoff_ms: 3000,
            retry_settle_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// Every duration set to `ms`; handy for driving the loop quickly
    pub fn uniform(ms: u64) -> Self {
        Self {
            setup_dwell_ms: ms,
            drumroll_ms: ms,
            guess_hold_ms: ms,
            reveal_narration_delay_ms: ms,
            reveal_dwell_ms: ms,
            transition_pause_ms: ms,
            failure_backoff_ms: ms,
            retry_settle_ms: ms,
        }
    }

    pub fn setup_dwell(&self) -> Duration {
        Duration::from_millis(self.setup_dwell_ms)
    }

    pub fn drumroll(&self) -> Duration {
        Duration::from_millis(self.drumroll_ms)
    }

    pub fn guess_hold(&self) -> Duration {
        Duration::from_millis(self.guess_hold_ms)
    }

    pub fn reveal_narration_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_narration_delay_ms)
    }

    pub fn reveal_dwell(&self) -> Duration {
        Duration::from_millis(self.reveal_dwell_ms)
    }

    pub fn transition_pause(&self) -> Duration {
        Duration::from_millis(self.transition_pause_ms)
    }

    pub fn failure_backoff(&self) -> Duration {
        Duration::from_millis(self.failure_backoff_ms)
    }

    pub fn retry_settle(&self) -> Duration {
        Duration::from_millis(self.retry_settle_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// JokeAPI client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JokeApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for JokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v2.jokeapi.dev/joke".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl StageConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve the config file and load it, falling back to defaults
    ///
    /// A file named on the command line must exist; a file found through the
    /// environment or the platform config dir is optional.
    pub fn load_or_default(cli_arg: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_arg {
            if !path.exists() {
                return Err(Error::Config(format!("Config file not found: {}", path.display())));
            }
            info!(path = %path.display(), "Loading config from command-line path");
            return Self::load(path);
        }

        match resolve_config_path(None) {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading config");
                Self::load(&path)
            }
            Some(path) => {
                warn!(path = %path.display(), "Config file not found, using built-in defaults");
                Ok(Self::default())
            }
            None => {
                info!("No config file, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        for (name, voice) in [
            ("speech.setup", &self.speech.setup),
            ("speech.guess", &self.speech.guess),
            ("speech.reveal", &self.speech.reveal),
        ] {
            if !(0.5..=2.0).contains(&voice.rate) {
                return Err(Error::Config(format!(
                    "{}.rate must be between 0.5 and 2.0, got {}",
                    name, voice.rate
                )));
            }
            if !(0.5..=2.0).contains(&voice.pitch) {
                return Err(Error::Config(format!(
                    "{}.pitch must be between 0.5 and 2.0, got {}",
                    name, voice.pitch
                )));
            }
        }

        for (name, ms) in [
            ("timings.setup_dwell_ms", self.timings.setup_dwell_ms),
            ("timings.reveal_dwell_ms", self.timings.reveal_dwell_ms),
        ] {
            if !(500..=10_000).contains(&ms) {
                return Err(Error::Config(format!(
                    "{} must be between 500 and 10000, got {}",
                    name, ms
                )));
            }
        }

        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be greater than 0".to_string()));
        }

        Ok(())
    }

    pub fn network_auto_retry(&self) -> Option<Duration> {
        self.network_auto_retry_ms.map(Duration::from_millis)
    }
}

/// Resolve which config file to read
///
/// Returns `None` only when no candidate location can be determined.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: platform config directory
    default_config_path()
}

/// `<user config dir>/jester/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jester").join("config.toml"))
}
