//! Vector math shared by enrollment and matching.

use crate::VoiceprintError;

/// Cosine similarity between two vectors: dot product over the product of
/// magnitudes, accumulated in f64.
///
/// Returns a value in `[-1, 1]`. Dimension mismatches and zero vectors
/// return `-1.0` so they can never pass a similarity threshold.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return -1.0;
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return -1.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Elementwise arithmetic mean of a set of equally sized embeddings.
pub fn mean_embedding(embeddings: &[Vec<f32>]) -> Result<Vec<f32>, VoiceprintError> {
    let first = embeddings.first().ok_or(VoiceprintError::EmptyInput)?;
    let dim = first.len();

    let mut sum = vec![0.0f64; dim];
    for emb in embeddings {
        if emb.len() != dim {
            return Err(VoiceprintError::DimensionMismatch {
                expected: dim,
                got: emb.len(),
            });
        }
        for (acc, &v) in sum.iter_mut().zip(emb.iter()) {
            *acc += v as f64;
        }
    }

    let n = embeddings.len() as f64;
    Ok(sum.into_iter().map(|v| (v / n) as f32).collect())
}

/// L2-normalizes a vector to unit length in place. Zero vectors are left as is.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}
