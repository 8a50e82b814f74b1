//! [`VoiceprintModel`] built from filterbank statistics.
//!
//! A dependency-free baseline: per-bin mean and standard deviation of the
//! log mel spectrum, each centered across bins and concatenated, then
//! L2-normalized. It captures the long-term spectral envelope of a voice,
//! which is enough to tell clearly different speakers apart on clean audio.
//! Neural extractors plug in through the same trait.

use tracing::debug;

use crate::error::VoiceprintError;
use crate::fbank::{compute_fbank, FbankConfig};
use crate::model::VoiceprintModel;
use crate::similarity::l2_normalize;

/// Model id recorded on profiles enrolled with [`FbankStatsModel`].
pub const FBANK_STATS_MODEL_ID: &str = "fbank-stats-v1";

/// Statistics-pooling voiceprint over log mel filterbank features.
pub struct FbankStatsModel {
    cfg: FbankConfig,
    model_id: String,
}

impl FbankStatsModel {
    pub fn new(cfg: FbankConfig) -> Self {
        Self {
            cfg,
            model_id: FBANK_STATS_MODEL_ID.to_string(),
        }
    }
}

impl Default for FbankStatsModel {
    fn default() -> Self {
        Self::new(FbankConfig::default())
    }
}

impl VoiceprintModel for FbankStatsModel {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>, VoiceprintError> {
        if sample_rate != self.cfg.sample_rate {
            return Err(VoiceprintError::SampleRateMismatch {
                expected: self.cfg.sample_rate,
                got: sample_rate,
            });
        }

        let features = compute_fbank(samples, &self.cfg).ok_or(VoiceprintError::AudioTooShort {
            min_samples: self.cfg.frame_length,
            got_samples: samples.len(),
        })?;

        let num_mels = self.cfg.num_mels;
        let t = features.len() as f64;

        let mut mean = vec![0.0f64; num_mels];
        for frame in &features {
            for (acc, &v) in mean.iter_mut().zip(frame.iter()) {
                *acc += v as f64;
            }
        }
        for m in mean.iter_mut() {
            *m /= t;
        }

        let mut std = vec![0.0f64; num_mels];
        for frame in &features {
            for ((acc, &v), &mu) in std.iter_mut().zip(frame.iter()).zip(mean.iter()) {
                let d = v as f64 - mu;
                *acc += d * d;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / t).sqrt();
        }

        center(&mut mean);
        center(&mut std);

        let mut embedding: Vec<f32> = mean.iter().chain(std.iter()).map(|&v| v as f32).collect();
        l2_normalize(&mut embedding);

        debug!(frames = features.len(), dim = embedding.len(), "fbank-stats embedding");
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.cfg.num_mels * 2
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn center(v: &mut [f64]) {
    if v.is_empty() {
        return;
    }
    let mean = v.iter().sum::<f64>() / v.len() as f64;
    for x in v.iter_mut() {
        *x -= mean;
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::similarity::cosine_similarity;

    /// Harmonic-rich "voice" with fundamental `f0` and a spectral tilt.
    fn voice(f0: f64, tilt: f64, secs: f64) -> Vec<f32> {
        let n = (secs * 16000.0) as usize;
        (0..n)
            .map(|i| {
                let t = i as f64 / 16000.0;
                let mut s = 0.0;
                for h in 1..=12 {
                    s += (2.0 * PI * f0 * h as f64 * t).sin() / (h as f64).powf(tilt);
                }
                (0.2 * s) as f32
            })
            .collect()
    }

    #[test]
    fn dimension_and_id() {
        let model = FbankStatsModel::default();
        assert_eq!(model.dimension(), 160);
        assert_eq!(model.model_id(), FBANK_STATS_MODEL_ID);
    }

    #[test]
    fn extract_is_unit_length_and_deterministic() {
        let model = FbankStatsModel::default();
        let audio = voice(120.0, 1.0, 1.0);
        let a = model.extract(&audio, 16000).unwrap();
        let b = model.extract(&audio, 16000).unwrap();
        assert_eq!(a.len(), 160);
        assert_eq!(a, b);
        let norm: f64 = a.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "got norm {norm}");
    }

    #[test]
    fn same_voice_scores_higher_than_different_voice() {
        let model = FbankStatsModel::default();
        let a1 = model.extract(&voice(110.0, 0.8, 1.0), 16000).unwrap();
        let a2 = model.extract(&voice(112.0, 0.8, 1.5), 16000).unwrap();
        let b = model.extract(&voice(260.0, 2.0, 1.0), 16000).unwrap();

        let same = cosine_similarity(&a1, &a2);
        let diff = cosine_similarity(&a1, &b);
        assert!(same > diff, "same={same} diff={diff}");
    }

    #[test]
    fn rejects_short_audio() {
        let model = FbankStatsModel::default();
        let err = model.extract(&vec![0.0; 100], 16000).unwrap_err();
        assert!(matches!(err, VoiceprintError::AudioTooShort { got_samples: 100, .. }));
    }

    #[test]
    fn rejects_wrong_sample_rate() {
        let model = FbankStatsModel::default();
        let err = model.extract(&voice(120.0, 1.0, 1.0), 44100).unwrap_err();
        assert!(matches!(
            err,
            VoiceprintError::SampleRateMismatch { expected: 16000, got: 44100 }
        ));
    }
}
