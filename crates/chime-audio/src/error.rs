use crate::backend::VoiceId;

/// Errors that can occur in the audio system.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to initialize audio backend: {0}")]
    InitFailed(String),

    #[error("audio playback failed: {0}")]
    PlaybackFailed(String),

    #[error("unknown voice {0:?}")]
    UnknownVoice(VoiceId),

    #[error("audio resource limit reached: {0}")]
    ResourceLimit(String),
}
