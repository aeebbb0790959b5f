use std::collections::HashMap;

use chime_assets::AudioClip;
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundHandle, StaticSoundSettings};
use kira::sound::PlaybackState;
use kira::track::{TrackBuilder, TrackHandle};
use kira::tween::Tween;
use tracing::info;

use crate::backend::{AudioOutput, OutputRoute, TrackId, VoiceId, VoiceParams};
use crate::error::AudioError;

/// Convert -1..1 panning to kira's 0..1 range (0.5 is centered).
fn to_kira_panning(panning: f64) -> f64 {
    (panning.clamp(-1.0, 1.0) + 1.0) / 2.0
}

struct KiraVoice {
    handle: StaticSoundHandle,
    params: VoiceParams,
}

/// Audio output backed by kira's `AudioManager` on the default device.
pub struct KiraBackend {
    manager: AudioManager<DefaultBackend>,
    voices: HashMap<VoiceId, KiraVoice>,
    tracks: HashMap<TrackId, TrackHandle>,
    next_voice: u64,
    next_track: u32,
}

impl KiraBackend {
    /// Open the default audio device.
    pub fn new() -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::InitFailed(e.to_string()))?;

        info!("Audio backend initialized");

        Ok(Self {
            manager,
            voices: HashMap::new(),
            tracks: HashMap::new(),
            next_voice: 0,
            next_track: 0,
        })
    }

    fn settings(&self, params: &VoiceParams) -> Result<StaticSoundSettings, AudioError> {
        let mut settings = StaticSoundSettings::new()
            .volume(params.volume)
            .panning(to_kira_panning(params.panning));
        if params.looping {
            settings = settings.loop_region(..);
        }
        if let OutputRoute::Track(track) = params.route {
            let handle = self
                .tracks
                .get(&track)
                .ok_or_else(|| AudioError::PlaybackFailed(format!("unknown output track {:?}", track)))?;
            settings = settings.output_destination(handle);
        }
        Ok(settings)
    }
}

impl AudioOutput for KiraBackend {
    fn start(&mut self, clip: &AudioClip, params: &VoiceParams) -> Result<VoiceId, AudioError> {
        let data = clip.sound().clone().with_settings(self.settings(params)?);
        let handle = self
            .manager
            .play(data)
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;

        self.next_voice += 1;
        let voice = VoiceId(self.next_voice);
        self.voices.insert(voice, KiraVoice { handle, params: *params });
        Ok(voice)
    }

    fn set_params(&mut self, voice: VoiceId, volume: f64, panning: f64) -> Result<(), AudioError> {
        let entry = self.voices.get_mut(&voice).ok_or(AudioError::UnknownVoice(voice))?;
        entry.handle.set_volume(volume, Tween::default());
        entry.handle.set_panning(to_kira_panning(panning), Tween::default());
        entry.params.volume = volume;
        entry.params.panning = panning;
        Ok(())
    }

    fn stop(&mut self, voice: VoiceId) {
        if let Some(mut entry) = self.voices.remove(&voice) {
            entry.handle.stop(Tween::default());
        }
    }

    fn is_playing(&self, voice: VoiceId) -> bool {
        self.voices
            .get(&voice)
            .is_some_and(|v| v.handle.state() != PlaybackState::Stopped)
    }

    fn voice_params(&self, voice: VoiceId) -> Option<VoiceParams> {
        self.voices.get(&voice).map(|v| v.params)
    }

    fn add_route(&mut self) -> Result<OutputRoute, AudioError> {
        let handle = self
            .manager
            .add_sub_track(TrackBuilder::new())
            .map_err(|e| AudioError::ResourceLimit(e.to_string()))?;
        let track = TrackId(self.next_track);
        self.next_track += 1;
        self.tracks.insert(track, handle);
        Ok(OutputRoute::Track(track))
    }

    /// Drop handles for sounds that have stopped playing.
    fn advance(&mut self, _real_delta: std::time::Duration) {
        self.voices
            .retain(|_, v| v.handle.state() != PlaybackState::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panning_maps_to_kira_range() {
        assert_eq!(to_kira_panning(-1.0), 0.0);
        assert_eq!(to_kira_panning(0.0), 0.5);
        assert_eq!(to_kira_panning(1.0), 1.0);
        assert_eq!(to_kira_panning(3.0), 1.0);
    }
}
