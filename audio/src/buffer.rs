//! Mono PCM buffer addressed in seconds.

/// Mono audio held as `f32` samples in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    fn index_at(&self, secs: f64) -> usize {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        ((secs * self.sample_rate as f64).round() as usize).min(self.samples.len())
    }

    /// Returns the samples between `start` and `end` seconds, clamped to the
    /// buffer. Inverted or out-of-range spans yield an empty slice.
    pub fn slice_secs(&self, start: f64, end: f64) -> &[f32] {
        let s = self.index_at(start);
        let e = self.index_at(end);
        if e <= s {
            return &[];
        }
        &self.samples[s..e]
    }

    /// Keeps only the first `max_secs` seconds. Returns true if samples were dropped.
    pub fn truncate_secs(&mut self, max_secs: f64) -> bool {
        let keep = self.index_at(max_secs);
        if keep < self.samples.len() {
            self.samples.truncate(keep);
            true
        } else {
            false
        }
    }
}

/// Averages interleaved frames down to one channel.
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let ch = channels.max(1) as usize;
    if ch == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}
