//! Speaker embeddings ("voiceprints") and the vector math used to compare them.
//!
//! # Pipeline
//!
//! 1. [`VoiceprintModel::extract`]: mono f32 audio -> embedding vector
//! 2. [`mean_embedding`]: several embeddings of one speaker -> one representative
//! 3. [`cosine_similarity`]: representative vs. enrolled profile -> score in `[-1, 1]`
//!
//! # Feature Extraction
//!
//! The [`fbank`] module provides Kaldi-style log mel filterbank extraction
//! (Povey window, pre-emphasis 0.97, radix-2 FFT, triangular mel filters).
//! [`FbankStatsModel`] pools those features into a fixed-size voiceprint.

mod error;
pub mod fbank;
mod model;
mod model_fbank;
mod similarity;

pub use error::VoiceprintError;
pub use fbank::{compute_fbank, FbankConfig};
pub use model::{VoiceprintModel, CANONICAL_SAMPLE_RATE};
pub use model_fbank::{FbankStatsModel, FBANK_STATS_MODEL_ID};
pub use similarity::{cosine_similarity, l2_normalize, mean_embedding};
