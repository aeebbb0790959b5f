use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use kira::sound::static_sound::StaticSoundData;

use crate::error::AssetError;

/// A decoded audio clip. Cheap to clone: the sample data is shared.
#[derive(Clone)]
pub struct AudioClip {
    name: String,
    duration: Duration,
    sound: StaticSoundData,
}

impl AudioClip {
    /// Decode a clip from a file on disk.
    pub fn from_file(name: impl Into<String>, path: &Path) -> Result<Self, AssetError> {
        let sound = StaticSoundData::from_file(path)
            .map_err(|e| AssetError::Decode(path.to_path_buf(), e.to_string()))?;
        Ok(Self::from_sound(name, sound))
    }

    /// Decode a clip from an in-memory encoded file (for example `include_bytes!`).
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AssetError> {
        let name = name.into();
        let sound = StaticSoundData::from_cursor(Cursor::new(bytes))
            .map_err(|e| AssetError::Decode(name.clone().into(), e.to_string()))?;
        Ok(Self::from_sound(name, sound))
    }

    fn from_sound(name: impl Into<String>, sound: StaticSoundData) -> Self {
        let duration = if sound.sample_rate == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(sound.frames.len() as f64 / sound.sample_rate as f64)
        };
        Self {
            name: name.into(),
            duration,
            sound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Playback length at normal rate.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The decoded samples, for handing to the audio backend.
    pub fn sound(&self) -> &StaticSoundData {
        &self.sound
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("name", &self.name)
            .field("duration", &self.duration)
            .finish()
    }
}
