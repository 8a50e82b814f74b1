use crate::VoiceprintError;

/// Sample rate every built-in model expects (16 kHz mono).
///
/// Must equal `voxid_audio::CANONICAL_SAMPLE_RATE`, the rate the converter
/// produces.
pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Extracts speaker embedding vectors from mono audio.
///
/// Samples are `f32` in `[-1, 1]`. The output is a dense vector whose
/// dimensionality is returned by [`VoiceprintModel::dimension`].
///
/// Embeddings are only comparable when they come from the same
/// [`VoiceprintModel::model_id`]. Profiles store that id so callers can
/// refuse to compare vectors across extractor versions.
///
/// Implementations are reused across many calls within one run, so any
/// expensive state (weights, filterbanks) should be built once in the
/// constructor.
pub trait VoiceprintModel: Send + Sync {
    /// Computes a speaker embedding from mono samples at `sample_rate`.
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, VoiceprintError>;

    /// Returns the dimensionality of the embedding vectors.
    fn dimension(&self) -> usize;

    /// Identifies the extractor that produced an embedding (e.g. "fbank-stats-v1").
    fn model_id(&self) -> &str;
}
