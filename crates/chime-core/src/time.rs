//! Time system for the Chime engine
//!
//! Tracks scaled game time alongside unscaled real time. A time scale of zero
//! (or an explicit pause) freezes game time while real time keeps advancing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl TimeConfig {
    /// `max_delta_time`, or its default when the configured value is negative or not finite.
    pub fn frame_clamp(&self) -> f32 {
        if self.max_delta_time.is_finite() && self.max_delta_time >= 0.0 {
            self.max_delta_time
        } else {
            Self::default().max_delta_time
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Scaled time since start in seconds
    pub total_time: f64,
    /// Real time since start in seconds
    pub unscaled_total_time: f64,
    /// Scaled delta time for this frame (clamped)
    pub delta_time: f32,
    /// Unscaled delta time (clamped)
    pub unscaled_delta_time: f32,
    /// Wall-clock delta time, not clamped
    pub real_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the game is paused
    pub paused: bool,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            total_time: 0.0,
            unscaled_total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            real_delta_time: 0.0,
            frame_count: 0,
            paused: false,
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        let raw_delta = if raw_delta.is_finite() { raw_delta.max(0.0) } else { 0.0 };
        self.real_delta_time = raw_delta;
        self.unscaled_delta_time = raw_delta.min(self.config.frame_clamp());
        self.unscaled_total_time += self.unscaled_delta_time as f64;
        self.frame_count += 1;

        self.delta_time = self.unscaled_delta_time * self.time_scale();
        self.total_time += self.delta_time as f64;
    }

    /// The effective time scale: zero while paused (or misconfigured),
    /// otherwise the configured scale.
    pub fn time_scale(&self) -> f32 {
        let scale = self.config.time_scale;
        if self.paused || !scale.is_finite() {
            0.0
        } else {
            scale.max(0.0)
        }
    }

    /// This frame's scaled delta.
    pub fn scaled_delta(&self) -> Duration {
        seconds(self.delta_time)
    }

    /// This frame's wall-clock delta, unaffected by pause, time scale or clamping.
    pub fn real_delta(&self) -> Duration {
        seconds(self.real_delta_time)
    }

    /// Whether game time is currently frozen (paused or scaled to zero).
    pub fn is_frozen(&self) -> bool {
        self.time_scale() == 0.0
    }

    /// Pause the game
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the game
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

fn seconds(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        time.pause();
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
        assert!((time.unscaled_delta_time - 0.016).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_scale_freezes_but_real_time_advances() {
        let mut time = GameTime::default();
        time.set_time_scale(0.0);
        assert!(time.is_frozen());

        time.update(0.1);
        time.update(0.1);
        assert_eq!(time.total_time, 0.0);
        assert!((time.unscaled_total_time - 0.2).abs() < 1e-6);
    }

    #[test]
    fn negative_scale_is_clamped() {
        let mut time = GameTime::default();
        time.set_time_scale(-3.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn delta_is_clamped_to_max() {
        let mut time = GameTime::default();
        time.update(5.0);
        assert!((time.unscaled_delta_time - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn resume_restores_configured_scale() {
        let mut time = GameTime::default();
        time.set_time_scale(2.0);
        time.pause();
        assert!(time.is_frozen());
        time.resume();
        assert_eq!(time.time_scale(), 2.0);
    }

    #[test]
    fn real_delta_is_not_clamped() {
        let mut time = GameTime::default();
        time.pause();
        time.update(1.0);
        assert!((time.unscaled_delta_time - 0.25).abs() < f32::EPSILON);
        assert_eq!(time.real_delta(), Duration::from_secs(1));
        assert_eq!(time.scaled_delta(), Duration::ZERO);
    }

    #[test]
    fn bad_frame_deltas_count_as_zero() {
        let mut time = GameTime::default();
        time.update(-1.0);
        time.update(f32::NAN);
        time.update(f32::INFINITY);
        assert_eq!(time.total_time, 0.0);
        assert_eq!(time.real_delta(), Duration::ZERO);
    }

    #[test]
    fn invalid_max_delta_falls_back_to_default() {
        let config: TimeConfig = toml::from_str("max_delta_time = -1.0").unwrap();
        let mut time = GameTime::new(config);
        time.update(0.016);
        assert!((time.unscaled_delta_time - 0.016).abs() < f32::EPSILON);
        time.update(1.0);
        assert!((time.unscaled_delta_time - 0.25).abs() < f32::EPSILON);

        time.config.max_delta_time = f32::NAN;
        time.update(1.0);
        assert!((time.unscaled_delta_time - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn non_finite_scale_freezes() {
        let mut time = GameTime::default();
        time.config.time_scale = f32::INFINITY;
        assert!(time.is_frozen());
        time.update(0.1);
        assert_eq!(time.scaled_delta(), Duration::ZERO);
    }
}
