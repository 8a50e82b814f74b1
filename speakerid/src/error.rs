use thiserror::Error;
use voxid_audio::AudioError;
use voxid_profile::ProfileError;
use voxid_voiceprint::VoiceprintError;

/// Errors returned by enrollment and matching.
#[derive(Error, Debug)]
pub enum SpeakerIdError {
    /// Bad caller input: missing file, duration out of bounds, empty id.
    #[error("speakerid: {0}")]
    Validation(String),

    #[error("speakerid: embedding extraction failed: {0}")]
    Extraction(#[from] VoiceprintError),

    #[error("speakerid: not found: {0}")]
    NotFound(String),

    #[error("speakerid: profile store: {0}")]
    Store(#[from] ProfileError),

    #[error("speakerid: audio: {0}")]
    Audio(#[from] AudioError),

    #[error("speakerid: transcript: {0}")]
    Transcript(String),

    #[error("speakerid: invalid config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SpeakerIdError {
    fn from(e: serde_json::Error) -> Self {
        SpeakerIdError::Transcript(e.to_string())
    }
}

/// Result type for speaker identification operations.
pub type Result<T> = std::result::Result<T, SpeakerIdError>;
