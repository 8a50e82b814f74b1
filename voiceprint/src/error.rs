use thiserror::Error;

/// Errors returned by voiceprint operations.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    #[error("audio too short: need at least {min_samples} samples, got {got_samples}")]
    AudioTooShort { min_samples: usize, got_samples: usize },

    #[error("sample rate mismatch: model expects {expected} Hz, got {got} Hz")]
    SampleRateMismatch { expected: u32, got: u32 },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("no embeddings to aggregate")]
    EmptyInput,

    #[error("model error: {0}")]
    Model(String),
}
