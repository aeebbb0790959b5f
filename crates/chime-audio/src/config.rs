use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Audio volume configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Master volume multiplier (0.0–1.0).
    pub master_volume: f64,
    /// Sound effects volume multiplier (0.0–1.0).
    pub sfx_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
        }
    }
}

impl AudioConfig {
    /// Effective SFX volume (master * sfx).
    pub fn effective_sfx_volume(&self) -> f64 {
        self.master_volume * self.sfx_volume
    }
}

/// Settings for a [`SoundPlayer`](crate::SoundPlayer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPlayerConfig {
    /// Where sounds played by name (or without a position) are placed.
    pub anchor: Vec3,
    /// Extra time, in seconds, a one-shot emitter lives past the end of its clip.
    pub cleanup_padding: f32,
    /// Read from the `[audio]` settings section rather than this one.
    #[serde(skip)]
    pub volumes: AudioConfig,
}

impl Default for SoundPlayerConfig {
    fn default() -> Self {
        Self {
            anchor: Vec3::ZERO,
            cleanup_padding: 0.1,
            volumes: AudioConfig::default(),
        }
    }
}

impl SoundPlayerConfig {
    /// Lifetime of a one-shot emitter playing a clip of the given length.
    ///
    /// A padding that is not a usable number of seconds falls back to the default.
    pub fn emitter_lifetime(&self, clip_duration: Duration) -> Duration {
        let padding = if self.cleanup_padding.is_finite() {
            Duration::try_from_secs_f32(self.cleanup_padding.max(0.0)).ok()
        } else {
            None
        };
        let padding = padding.unwrap_or_else(|| Duration::from_secs_f32(Self::default().cleanup_padding));
        clip_duration.saturating_add(padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volumes() {
        let config = AudioConfig::default();
        assert_eq!(config.master_volume, 1.0);
        assert_eq!(config.sfx_volume, 1.0);
    }

    #[test]
    fn effective_volume() {
        let config = AudioConfig {
            master_volume: 0.5,
            sfx_volume: 0.6,
        };
        assert!((config.effective_sfx_volume() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn lifetime_adds_padding() {
        let config = SoundPlayerConfig::default();
        let lifetime = config.emitter_lifetime(Duration::from_millis(500));
        assert!((lifetime.as_secs_f64() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn negative_padding_is_ignored() {
        let config = SoundPlayerConfig {
            cleanup_padding: -1.0,
            ..Default::default()
        };
        assert_eq!(config.emitter_lifetime(Duration::from_secs(1)), Duration::from_secs(1));
    }

    #[test]
    fn unusable_padding_uses_default() {
        for padding in [f32::INFINITY, f32::NAN, 1e30] {
            let config = SoundPlayerConfig {
                cleanup_padding: padding,
                ..Default::default()
            };
            let lifetime = config.emitter_lifetime(Duration::from_millis(500));
            assert!((lifetime.as_secs_f64() - 0.6).abs() < 1e-6, "padding {padding}: {lifetime:?}");
        }
    }
}
