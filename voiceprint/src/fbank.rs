//! Log mel filterbank front end.
//!
//! Kaldi-style framing (Povey window, pre-emphasis, DC removal) over mono
//! `f32` samples in `[-1, 1]`, followed by a triangular mel filterbank and a
//! natural log. Used by [`crate::FbankStatsModel`] and usable by any model
//! that expects fbank features.

use std::f64::consts::PI;

use crate::model::CANONICAL_SAMPLE_RATE;

/// Configures mel filterbank feature extraction.
///
/// Defaults match the usual speaker-embedding front end: 16 kHz input,
/// 25 ms frames, 10 ms shift, 80 mel bins, 20-7600 Hz.
#[derive(Debug, Clone)]
pub struct FbankConfig {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: u32,
    /// Number of mel filterbank channels (default: 80).
    pub num_mels: usize,
    /// Frame length in samples (default: 400 = 25ms @ 16kHz).
    pub frame_length: usize,
    /// Frame shift in samples (default: 160 = 10ms @ 16kHz).
    pub frame_shift: usize,
    /// Pre-emphasis coefficient (default: 0.97).
    pub pre_emphasis: f64,
    /// Floor for mel energies before the log (default: 1e-10).
    pub energy_floor: f64,
    /// Low cutoff frequency for mel bins (default: 20 Hz).
    pub low_freq: f64,
    /// High cutoff frequency, non-positive = offset from Nyquist (default: -400).
    pub high_freq: f64,
    /// Remove DC offset per frame (default: true).
    pub remove_dc: bool,
    /// Use Povey window (hamming^0.85) instead of Hamming (default: true).
    pub povey_window: bool,
}

impl Default for FbankConfig {
    fn default() -> Self {
        Self {
            sample_rate: CANONICAL_SAMPLE_RATE,
            num_mels: 80,
            frame_length: 400, // 25ms @ 16kHz
            frame_shift: 160,  // 10ms @ 16kHz
            pre_emphasis: 0.97,
            energy_floor: 1e-10,
            low_freq: 20.0,
            high_freq: -400.0, // 7600 Hz for 16kHz
            remove_dc: true,
            povey_window: true,
        }
    }
}

impl FbankConfig {
    /// Returns the number of frames produced for `n_samples` input samples.
    pub fn num_frames(&self, n_samples: usize) -> usize {
        if self.frame_shift == 0 || n_samples < self.frame_length {
            return 0;
        }
        (n_samples - self.frame_length) / self.frame_shift + 1
    }
}

/// Extracts log mel filterbank features.
///
/// Output is `[num_frames][num_mels]`. Returns `None` if the audio is too
/// short for a single frame or the configuration is degenerate.
pub fn compute_fbank(samples: &[f32], cfg: &FbankConfig) -> Option<Vec<Vec<f32>>> {
    if cfg.frame_shift == 0 || cfg.frame_length == 0 || cfg.num_mels == 0 {
        return None;
    }

    let num_frames = cfg.num_frames(samples.len());
    if num_frames == 0 {
        return None;
    }

    let fft_size = next_pow2(cfg.frame_length);
    let half_fft = fft_size / 2 + 1;

    let window = if cfg.povey_window {
        povey_window(cfg.frame_length)
    } else {
        hamming_window(cfg.frame_length)
    };

    let high_freq = if cfg.high_freq <= 0.0 {
        cfg.sample_rate as f64 / 2.0 + cfg.high_freq
    } else {
        cfg.high_freq
    };

    let filterbank = mel_filterbank(cfg.num_mels, fft_size, cfg.sample_rate, cfg.low_freq, high_freq);

    let mut result = Vec::with_capacity(num_frames);
    let mut fft_buf = vec![(0.0f64, 0.0f64); fft_size];
    let mut power_spec = vec![0.0f64; half_fft];

    for f in 0..num_frames {
        let offset = f * cfg.frame_shift;
        let mut frame_buf: Vec<f64> = samples[offset..offset + cfg.frame_length]
            .iter()
            .map(|&s| s as f64)
            .collect();

        if cfg.remove_dc {
            let mean: f64 = frame_buf.iter().sum::<f64>() / cfg.frame_length as f64;
            for v in &mut frame_buf {
                *v -= mean;
            }
        }

        // Pre-emphasis runs after DC removal, per frame.
        if cfg.pre_emphasis > 0.0 {
            for i in (1..cfg.frame_length).rev() {
                frame_buf[i] -= cfg.pre_emphasis * frame_buf[i - 1];
            }
            frame_buf[0] *= 1.0 - cfg.pre_emphasis;
        }

        for v in fft_buf.iter_mut() {
            *v = (0.0, 0.0);
        }
        for (i, (&x, &w)) in frame_buf.iter().zip(window.iter()).enumerate() {
            fft_buf[i] = (x * w, 0.0);
        }

        fft(&mut fft_buf);

        for (k, p) in power_spec.iter_mut().enumerate() {
            let (r, im) = fft_buf[k];
            *p = r * r + im * im;
        }

        let frame: Vec<f32> = filterbank
            .iter()
            .map(|filter| {
                let energy: f64 = filter
                    .iter()
                    .zip(power_spec.iter())
                    .map(|(&w, &p)| w * p)
                    .sum();
                energy.max(cfg.energy_floor).ln() as f32
            })
            .collect();
        result.push(frame);
    }

    Some(result)
}

fn next_pow2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

fn hamming_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// Povey window (hamming^0.85) used by Kaldi.
fn povey_window(n: usize) -> Vec<f64> {
    hamming_window(n).into_iter().map(|w| w.powf(0.85)).collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank weights, `[num_mels][half_fft]`.
fn mel_filterbank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: u32,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    let bin_indices: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let mel = mel_low + i as f64 * (mel_high - mel_low) / (num_mels + 1) as f64;
            let bin = (mel_to_hz(mel) * fft_size as f64 / sample_rate as f64).floor() as isize;
            bin.clamp(0, half_fft as isize - 1) as usize
        })
        .collect();

    let mut fb = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let mut filter = vec![0.0f64; half_fft];
        let (left, center, right) = (bin_indices[m], bin_indices[m + 1], bin_indices[m + 2]);

        if center > left {
            for k in left..=center {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        if right > center {
            for k in center..=right {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        fb.push(filter);
    }
    fb
}

/// In-place radix-2 Cooley-Tukey FFT over `(re, im)` pairs.
/// Input length must be a power of 2.
fn fft(x: &mut [(f64, f64)]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -2.0 * PI / size as f64;
        let wn = (angle.cos(), angle.sin());
        let mut start = 0;
        while start < n {
            let mut w = (1.0, 0.0);
            for k in 0..half {
                let u = x[start + k];
                let v = x[start + k + half];
                let t_re = w.0 * v.0 - w.1 * v.1;
                let t_im = w.0 * v.1 + w.1 * v.0;
                x[start + k] = (u.0 + t_re, u.1 + t_im);
                x[start + k + half] = (u.0 - t_re, u.1 - t_im);
                w = (w.0 * wn.0 - w.1 * wn.1, w.0 * wn.1 + w.1 * wn.0);
            }
            start += size;
        }
        size <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (0.5 * (freq * 2.0 * PI * i as f64 / 16000.0).sin()) as f32)
            .collect()
    }

    #[test]
    fn fbank_config_default() {
        let cfg = FbankConfig::default();
        assert_eq!(cfg.sample_rate, 16000);
        assert_eq!(cfg.num_mels, 80);
        assert_eq!(cfg.frame_length, 400);
        assert_eq!(cfg.frame_shift, 160);
    }

    #[test]
    fn compute_fbank_too_short() {
        let cfg = FbankConfig::default();
        assert!(compute_fbank(&vec![0.0; 100], &cfg).is_none());
    }

    #[test]
    fn compute_fbank_silence() {
        let cfg = FbankConfig::default();
        // (800 - 400) / 160 + 1 = 3 frames.
        let features = compute_fbank(&vec![0.0; 800], &cfg).unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].len(), 80);
    }

    #[test]
    fn compute_fbank_tone() {
        let cfg = FbankConfig::default();
        // (16000 - 400) / 160 + 1 = 98 frames.
        let features = compute_fbank(&tone(440.0, 16000), &cfg).unwrap();
        assert_eq!(features.len(), 98);

        let first = &features[0];
        assert!(
            first.windows(2).any(|w| (w[0] - w[1]).abs() > 0.01),
            "tone should produce varied mel energies"
        );
    }

    #[test]
    fn fft_impulse() {
        let mut buf = vec![(1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        fft(&mut buf);
        for (re, im) in &buf {
            assert!((re - 1.0).abs() < 1e-10);
            assert!(im.abs() < 1e-10);
        }
    }

    #[test]
    fn fft_parseval() {
        let n = 8;
        let mut buf: Vec<(f64, f64)> = (0..n)
            .map(|i| ((2.0 * PI * i as f64 / n as f64).sin(), 0.0))
            .collect();
        let time_energy: f64 = buf.iter().map(|(r, im)| r * r + im * im).sum();
        fft(&mut buf);
        let freq_energy: f64 = buf.iter().map(|(r, im)| r * r + im * im).sum();
        assert!((time_energy * n as f64 - freq_energy).abs() < 1e-8);
    }

    #[test]
    fn mel_hz_roundtrip() {
        for &hz in &[0.0, 100.0, 440.0, 1000.0, 8000.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((hz - back).abs() < 1e-6, "roundtrip failed for {hz}: got {back}");
        }
    }
}
