use chime_assets::{AssetHandle, AudioClip};
use glam::Vec3;

use crate::backend::{OutputRoute, VoiceId};

/// Name given to every emitter object the sound player spawns.
pub const EMITTER_NAME: &str = "AudioSource (Temp)";

/// Lifecycle of an emitter's voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// Created, not started yet.
    Idle,
    Playing,
    /// The voice finished or was stopped.
    Stopped,
}

/// Component attached to emitter objects: what they play and how.
#[derive(Debug, Clone)]
pub struct AudioEmitter {
    pub clip: AssetHandle<AudioClip>,
    pub volume: f64,
    pub spatial_blend: f32,
    pub route: OutputRoute,
    pub looping: bool,
    pub(crate) state: EmitterState,
    pub(crate) voice: Option<VoiceId>,
}

impl AudioEmitter {
    pub(crate) fn new(clip: AssetHandle<AudioClip>) -> Self {
        Self {
            clip,
            volume: 1.0,
            spatial_blend: 0.0,
            route: OutputRoute::Main,
            looping: false,
            state: EmitterState::Idle,
            voice: None,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn voice(&self) -> Option<VoiceId> {
        self.voice
    }

    pub fn is_playing(&self) -> bool {
        self.state == EmitterState::Playing
    }
}

/// How a one-shot sound is played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    /// Where the emitter is placed.
    pub position: Vec3,
    /// Linear volume, before the configured SFX volume is applied. Default 1.0.
    pub volume: f64,
    /// 0.0 plays flat, 1.0 is fully positional. Default 0.0.
    pub spatial_blend: f32,
    /// Output route. `None` uses the player's route.
    pub route: Option<OutputRoute>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            volume: 1.0,
            spatial_blend: 0.0,
            route: None,
        }
    }
}

impl PlaybackSettings {
    /// Default settings at a position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_spatial_blend(mut self, blend: f32) -> Self {
        self.spatial_blend = blend;
        self
    }

    pub fn with_route(mut self, route: OutputRoute) -> Self {
        self.route = Some(route);
        self
    }
}
