//! Settings with persistence
//!
//! Settings are saved to `~/.config/chime/settings.toml`

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chime_audio::{AudioConfig, SoundPlayerConfig};
use chime_core::TimeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioConfig,
    pub player: SoundPlayerConfig,
    pub time: TimeConfig,
    pub assets: AssetSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("chime"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    for problem in settings.problems() {
                        warn!("Settings: {}, using the default instead", problem);
                    }
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Values that cannot be used as configured. Each one falls back to its default.
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let max_delta = self.time.max_delta_time;
        if !max_delta.is_finite() || max_delta < 0.0 {
            problems.push(format!("time.max_delta_time = {} is not a usable frame clamp", max_delta));
        }
        if !self.time.time_scale.is_finite() {
            problems.push(format!("time.time_scale = {} is not finite", self.time.time_scale));
        }
        let padding = self.player.cleanup_padding;
        if !padding.is_finite() || Duration::try_from_secs_f32(padding.max(0.0)).is_err() {
            problems.push(format!("player.cleanup_padding = {} is not a usable number of seconds", padding));
        }
        problems
    }

    /// Sound player settings with the configured volumes applied.
    pub fn player_config(&self) -> SoundPlayerConfig {
        SoundPlayerConfig {
            volumes: self.audio.clone(),
            ..self.player.clone()
        }
    }
}

/// Where sounds are loaded from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory sound names are resolved against
    pub root: PathBuf,
    /// Optional TOML file mapping sound names to files, relative to `root`
    pub manifest: Option<PathBuf>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets/sounds"),
            manifest: None,
        }
    }
}
