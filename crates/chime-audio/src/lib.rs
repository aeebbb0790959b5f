//! Chime Audio - sound emitters and playback using kira
//!
//! The [`SoundPlayer`] turns "play this sound" into a short-lived emitter
//! object in the scene, drives it on an [`AudioOutput`], and cleans it up
//! when the sound is over, even while game time is paused.

mod backend;
mod config;
mod emitter;
mod error;
mod kira_backend;
mod player;
mod spatial;

pub use backend::{AudioOutput, NullOutput, OutputRoute, TrackId, VoiceId, VoiceParams};
pub use config::{AudioConfig, SoundPlayerConfig};
pub use emitter::{AudioEmitter, EmitterState, PlaybackSettings, EMITTER_NAME};
pub use error::AudioError;
pub use kira_backend::KiraBackend;
pub use player::SoundPlayer;
pub use spatial::{blend_spatial, compute_spatial, Listener, SpatialParams};
