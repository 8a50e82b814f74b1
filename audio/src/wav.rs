//! WAV decoding and encoding via `hound`.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::buffer::PcmBuffer;
use crate::error::AudioError;

/// Header-level description of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Frames per channel.
    pub frames: u32,
}

impl WavInfo {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}

fn decode_err(path: &Path, e: impl ToString) -> AudioError {
    AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn open(path: &Path) -> Result<WavReader<std::io::BufReader<std::fs::File>>, AudioError> {
    if !path.exists() {
        return Err(AudioError::NotFound(path.to_path_buf()));
    }
    WavReader::open(path).map_err(|e| decode_err(path, e))
}

/// Reads only the header.
pub fn probe(path: &Path) -> Result<WavInfo, AudioError> {
    let reader = open(path)?;
    let spec = reader.spec();
    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames: reader.duration(),
    })
}

/// Decodes the whole file into interleaved `f32` samples in `[-1, 1]`.
pub fn read(path: &Path) -> Result<(Vec<f32>, WavInfo), AudioError> {
    let mut reader = open(path)?;
    let spec = reader.spec();
    let info = WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames: reader.duration(),
    };

    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| decode_err(path, e))?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(AudioError::Unsupported(format!(
                    "{} bits per sample",
                    spec.bits_per_sample
                )));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| decode_err(path, e))?
        }
    };

    Ok((samples, info))
}

/// Writes a mono buffer as 16-bit PCM.
pub fn write(path: &Path, pcm: &PcmBuffer) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: pcm.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(|e| decode_err(path, e))?;
    for &s in pcm.samples() {
        let v = (s * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(v).map_err(|e| decode_err(path, e))?;
    }
    writer.finalize().map_err(|e| decode_err(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_probe_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<f32> = (0..8000).map(|i| ((i % 100) as f32 / 100.0) - 0.5).collect();
        write(&path, &PcmBuffer::new(samples.clone(), 8000)).unwrap();

        let info = probe(&path).unwrap();
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frames, 8000);
        assert_eq!(info.duration_secs(), 1.0);

        let (decoded, _) = read(&path).unwrap();
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in decoded.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn missing_file() {
        let err = probe(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, AudioError::NotFound(_)));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"not a riff file").unwrap();
        assert!(matches!(read(&path), Err(AudioError::Decode { .. })));
    }
}
