//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `midiauto.toml` in the working directory, or at the path in
//! `MIDIAUTO_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use midiauto_app::engine::EngineSettings;
use midiauto_domain::automation::AutomationDescriptor;
use midiauto_domain::command::CommandBindings;
use midiauto_domain::geometry::Rect;

const DEFAULT_PATH: &str = "midiauto.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker timing and match tuning.
    pub engine: EngineConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Where MIDI messages come from.
    pub midi: MidiConfig,
    /// Signatures bound to the global commands.
    pub commands: CommandBindings,
    /// The configured automations.
    pub automations: Vec<AutomationDescriptor>,
    /// Virtual screen seeding.
    pub screen: ScreenConfig,
}

/// Engine tuning, in configuration units.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interval between two checks of an automation's `active` flag.
    pub poll_interval_ms: u64,
    /// Upper bound of a single match wait.
    pub match_timeout_ms: u64,
    /// Minimum similarity score for a template match.
    pub min_similarity: f64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidiSource {
    /// Hex-encoded messages, one per line, on standard input.
    #[default]
    Stdin,
    /// A hardware input port.
    Midir,
}

/// MIDI input configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    pub source: MidiSource,
    /// Substring of the input port name; the first port when unset.
    pub input_device: Option<String>,
    /// Start in learn mode: signatures are logged, nothing is dispatched.
    pub learn: bool,
}

/// Templates visible on the virtual screen at start-up.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub visible: Vec<VisibleTemplate>,
}

#[derive(Debug, Deserialize)]
pub struct VisibleTemplate {
    pub template: String,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl VisibleTemplate {
    #[must_use]
    pub fn region(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

impl Config {
    /// Load configuration from `midiauto.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed or invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MIDIAUTO_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MIDIAUTO_MIDI_DEVICE") {
            self.midi.source = MidiSource::Midir;
            self.midi.input_device = Some(val);
        }
        if let Ok(val) = std::env::var("MIDIAUTO_LEARN") {
            self.midi.learn = matches!(val.as_str(), "1" | "true" | "yes" | "on");
        }
        if let Ok(val) = std::env::var("MIDIAUTO_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "engine.poll_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.engine.match_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "engine.match_timeout_ms must be non-zero".to_string(),
            ));
        }
        self.engine_settings()
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;

        let mut ids = HashSet::new();
        for automation in &self.automations {
            if !ids.insert(automation.id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate automation id {}",
                    automation.id
                )));
            }
        }

        if self.midi.source == MidiSource::Midir && !cfg!(feature = "midir") {
            return Err(ConfigError::Validation(
                "midi.source = \"midir\" requires the `midir` feature".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            poll_interval: Duration::from_millis(self.engine.poll_interval_ms),
            match_timeout: Duration::from_millis(self.engine.match_timeout_ms),
            min_similarity: self.engine.min_similarity,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            match_timeout_ms: 10_000,
            min_similarity: 0.7,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "midiautod=info,midiauto=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
