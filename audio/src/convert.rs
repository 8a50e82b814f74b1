//! Conversion of arbitrary input audio to the extractor's canonical format.

use std::path::Path;

use tracing::debug;

use crate::buffer::{downmix, PcmBuffer};
use crate::error::AudioError;
use crate::resample::resample;
use crate::wav;

/// Canonical extractor input: mono, 16 kHz.
///
/// Must equal `voxid_voiceprint::CANONICAL_SAMPLE_RATE`; converted audio is
/// fed to the extractor without further resampling.
pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Turns an audio file into canonical mono PCM.
///
/// The CLI uses [`WavConverter`]; pipelines that shell out to an external
/// transcoder can provide their own implementation.
pub trait AudioConverter {
    /// Returns the duration of the file in seconds without decoding it.
    fn probe_duration(&self, path: &Path) -> Result<f64, AudioError>;

    /// Decodes, downmixes and resamples the file.
    fn to_canonical(&self, path: &Path) -> Result<PcmBuffer, AudioError>;
}

/// In-process converter for WAV input (any rate, any channel count).
#[derive(Debug, Clone)]
pub struct WavConverter {
    target_rate: u32,
}

impl WavConverter {
    pub fn new(target_rate: u32) -> Self {
        Self { target_rate }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }
}

impl Default for WavConverter {
    fn default() -> Self {
        Self::new(CANONICAL_SAMPLE_RATE)
    }
}

impl AudioConverter for WavConverter {
    fn probe_duration(&self, path: &Path) -> Result<f64, AudioError> {
        Ok(wav::probe(path)?.duration_secs())
    }

    fn to_canonical(&self, path: &Path) -> Result<PcmBuffer, AudioError> {
        let (interleaved, info) = wav::read(path)?;
        let mono = downmix(&interleaved, info.channels);
        let samples = resample(&mono, info.sample_rate, self.target_rate)?;
        debug!(
            path = %path.display(),
            src_rate = info.sample_rate,
            channels = info.channels,
            samples = samples.len(),
            "converted audio to canonical format"
        );
        Ok(PcmBuffer::new(samples, self.target_rate))
    }
}
