//! Sample rate conversion with rubato's FFT resampler.

use rubato::{FftFixedInOut, Resampler};

use crate::error::AudioError;

const CHUNK_FRAMES: usize = 1024;

/// Resamples mono audio from `from_rate` to `to_rate`.
///
/// The resampler's fixed delay is trimmed and the output is cut to
/// `len * to_rate / from_rate` samples, so timestamps keep lining up with
/// the source.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AudioError::Resample(format!(
            "invalid sample rates {from_rate} -> {to_rate}"
        )));
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_FRAMES, 1)?;

    let expected = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    let delay = resampler.output_delay();

    let mut out = Vec::with_capacity(expected + delay + CHUNK_FRAMES);
    let mut input = vec![Vec::<f32>::new()];
    let mut output = vec![Vec::<f32>::new()];
    let mut pos = 0;

    // Feed zero padding past the end until the delayed tail has been flushed.
    while out.len() < expected + delay {
        let need = resampler.input_frames_next();
        input[0].clear();
        if pos < samples.len() {
            let end = (pos + need).min(samples.len());
            input[0].extend_from_slice(&samples[pos..end]);
            pos = end;
        }
        input[0].resize(need, 0.0);

        output[0].clear();
        output[0].resize(resampler.output_frames_next(), 0.0);
        let (_, written) = resampler.process_into_buffer(&input, &mut output, None)?;
        out.extend_from_slice(&output[0][..written]);
    }

    out.drain(..delay.min(out.len()));
    out.truncate(expected);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_passthrough() {
        let s = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&s, 16000, 16000).unwrap(), s);
    }

    #[test]
    fn output_length_tracks_ratio() {
        let s: Vec<f32> = (0..48000).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        let out = resample(&s, 48000, 16000).unwrap();
        assert_eq!(out.len(), 16000);

        let up = resample(&s[..8000], 8000, 16000).unwrap();
        assert_eq!(up.len(), 16000);
    }

    #[test]
    fn preserves_low_frequency_tone() {
        let tone: Vec<f32> = (0..44100)
            .map(|i| (2.0 * std::f32::consts::PI * 200.0 * i as f32 / 44100.0).sin() * 0.5)
            .collect();
        let out = resample(&tone, 44100, 16000).unwrap();
        // Skip the edges where the filter rings.
        let peak = out[2000..14000].iter().fold(0.0f32, |m, &v| m.max(v.abs()));
        assert!((peak - 0.5).abs() < 0.05, "peak {peak}");
    }

    #[test]
    fn rejects_zero_rate() {
        assert!(resample(&[0.0], 0, 16000).is_err());
    }
}
