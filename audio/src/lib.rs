//! Audio plumbing for speaker identification.
//!
//! - [`PcmBuffer`]: mono `f32` samples with time-based slicing and truncation
//! - [`wav`]: WAV probe/decode/encode
//! - [`resample`]: sample rate conversion (rubato)
//! - [`AudioConverter`]: any input file -> canonical mono 16 kHz
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use voxid_audio::{AudioConverter, WavConverter};
//!
//! let conv = WavConverter::default();
//! let pcm = conv.to_canonical(Path::new("meeting.wav")).unwrap();
//! let first_turn = pcm.slice_secs(0.0, 4.2);
//! ```

mod buffer;
mod convert;
mod error;
pub mod resample;
pub mod wav;

pub use buffer::{downmix, PcmBuffer};
pub use convert::{AudioConverter, WavConverter, CANONICAL_SAMPLE_RATE};
pub use error::AudioError;
pub use resample::resample;
pub use wav::WavInfo;
