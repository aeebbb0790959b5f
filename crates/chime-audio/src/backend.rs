use std::collections::HashMap;
use std::time::Duration;

use chime_assets::AudioClip;

use crate::error::AudioError;

/// Identifies one playing instance of a clip on an [`AudioOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u64);

/// Identifies a sub-track (mixer bus) created by [`AudioOutput::add_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u32);

/// Where a voice's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputRoute {
    /// Straight to the main output.
    #[default]
    Main,
    /// Through a sub-track, so a whole group can be mixed together.
    Track(TrackId),
}

/// Parameters a voice is started or updated with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    /// Linear amplitude, 1.0 = unchanged.
    pub volume: f64,
    /// -1.0 = full left, 0.0 = center, 1.0 = full right.
    pub panning: f64,
    pub looping: bool,
    pub route: OutputRoute,
}

/// Abstraction over audio backends.
/// Implementations: [`KiraBackend`](crate::KiraBackend) and [`NullOutput`] (headless, testing).
pub trait AudioOutput {
    /// Start playing a clip and return the new voice.
    fn start(&mut self, clip: &AudioClip, params: &VoiceParams) -> Result<VoiceId, AudioError>;

    /// Change the volume and panning of a playing voice.
    fn set_params(&mut self, voice: VoiceId, volume: f64, panning: f64) -> Result<(), AudioError>;

    /// Stop a voice. Unknown or finished voices are ignored.
    fn stop(&mut self, voice: VoiceId);

    fn is_playing(&self, voice: VoiceId) -> bool;

    /// The parameters most recently applied to a voice.
    fn voice_params(&self, voice: VoiceId) -> Option<VoiceParams>;

    /// Create a new sub-track that voices can be routed through.
    fn add_route(&mut self) -> Result<OutputRoute, AudioError>;

    /// Called once per frame with the real (unscaled) frame time.
    fn advance(&mut self, _real_delta: Duration) {}
}

struct NullVoice {
    params: VoiceParams,
    /// `None` while looping.
    remaining: Option<Duration>,
}

/// An output that plays nothing but keeps track of voices as if it did:
/// one-shot voices finish after their clip's duration of real time.
#[derive(Default)]
pub struct NullOutput {
    voices: HashMap<VoiceId, NullVoice>,
    next_voice: u64,
    next_track: u32,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of voices still playing.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

impl AudioOutput for NullOutput {
    fn start(&mut self, clip: &AudioClip, params: &VoiceParams) -> Result<VoiceId, AudioError> {
        self.next_voice += 1;
        let voice = VoiceId(self.next_voice);
        let remaining = (!params.looping).then(|| clip.duration());
        self.voices.insert(voice, NullVoice { params: *params, remaining });
        Ok(voice)
    }

    fn set_params(&mut self, voice: VoiceId, volume: f64, panning: f64) -> Result<(), AudioError> {
        let entry = self.voices.get_mut(&voice).ok_or(AudioError::UnknownVoice(voice))?;
        entry.params.volume = volume;
        entry.params.panning = panning;
        Ok(())
    }

    fn stop(&mut self, voice: VoiceId) {
        self.voices.remove(&voice);
    }

    fn is_playing(&self, voice: VoiceId) -> bool {
        self.voices.contains_key(&voice)
    }

    fn voice_params(&self, voice: VoiceId) -> Option<VoiceParams> {
        self.voices.get(&voice).map(|v| v.params)
    }

    fn add_route(&mut self) -> Result<OutputRoute, AudioError> {
        let track = TrackId(self.next_track);
        self.next_track += 1;
        Ok(OutputRoute::Track(track))
    }

    fn advance(&mut self, real_delta: Duration) {
        self.voices.retain(|_, voice| match voice.remaining.as_mut() {
            None => true,
            Some(remaining) => {
                *remaining = remaining.saturating_sub(real_delta);
                !remaining.is_zero()
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(seconds: f32) -> AudioClip {
        let frames = (8000.0 * seconds) as u32;
        AudioClip::from_bytes("test", chime_assets::test_support::silent_wav(8000, frames)).unwrap()
    }

    fn params(looping: bool) -> VoiceParams {
        VoiceParams {
            volume: 1.0,
            panning: 0.0,
            looping,
            route: OutputRoute::Main,
        }
    }

    #[test]
    fn one_shot_voice_finishes_after_duration() {
        let mut output = NullOutput::new();
        let voice = output.start(&clip(0.5), &params(false)).unwrap();
        output.advance(Duration::from_millis(300));
        assert!(output.is_playing(voice));
        output.advance(Duration::from_millis(300));
        assert!(!output.is_playing(voice));
        assert_eq!(output.voice_count(), 0);
    }

    #[test]
    fn looping_voice_plays_until_stopped() {
        let mut output = NullOutput::new();
        let voice = output.start(&clip(0.1), &params(true)).unwrap();
        output.advance(Duration::from_secs(10));
        assert!(output.is_playing(voice));
        output.stop(voice);
        assert!(!output.is_playing(voice));
    }

    #[test]
    fn set_params_on_unknown_voice_fails() {
        let mut output = NullOutput::new();
        let err = output.set_params(VoiceId(42), 1.0, 0.0).unwrap_err();
        assert!(matches!(err, AudioError::UnknownVoice(VoiceId(42))));
    }

    #[test]
    fn routes_are_distinct() {
        let mut output = NullOutput::new();
        let a = output.add_route().unwrap();
        let b = output.add_route().unwrap();
        assert_ne!(a, b);
    }
}
