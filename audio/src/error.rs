use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by audio loading and conversion.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio: file not found: {0}")]
    NotFound(PathBuf),

    #[error("audio: decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("audio: unsupported format: {0}")]
    Unsupported(String),

    #[error("audio: resample: {0}")]
    Resample(String),

    #[error("audio: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rubato::ResamplerConstructionError> for AudioError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        AudioError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for AudioError {
    fn from(e: rubato::ResampleError) -> Self {
        AudioError::Resample(e.to_string())
    }
}
