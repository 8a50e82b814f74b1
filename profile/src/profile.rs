use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An enrolled speaker: a named voiceprint plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    /// Unique slug, also the vector artifact's file stem.
    pub id: String,

    /// Name shown in relabeled transcripts.
    pub display_name: String,

    /// Voice embedding. Dimension is fixed per extractor.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub embedding: Vec<f32>,

    pub created_at: DateTime<Utc>,

    /// Archive-relative path of the retained enrollment sample.
    pub source_audio_ref: String,

    /// Length of the enrollment clip actually used, in seconds.
    pub duration_seconds: f64,

    /// Extractor that produced `embedding`; vectors from different models
    /// are not comparable.
    pub model_id: String,
}

impl SpeakerProfile {
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// Provenance recorded alongside a new profile's embedding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileMetadata {
    pub source_audio_ref: String,
    pub duration_seconds: f64,
    pub model_id: String,
}

/// Input to [`crate::ProfileStore::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub id: String,
    pub display_name: String,
    pub embedding: Vec<f32>,
    pub metadata: ProfileMetadata,
}

impl NewProfile {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        embedding: Vec<f32>,
        metadata: ProfileMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            embedding,
            metadata,
        }
    }

    /// Stamps the profile with `created_at`.
    pub fn into_profile(self, created_at: DateTime<Utc>) -> SpeakerProfile {
        SpeakerProfile {
            id: self.id,
            display_name: self.display_name,
            embedding: self.embedding,
            created_at,
            source_audio_ref: self.metadata.source_audio_ref,
            duration_seconds: self.metadata.duration_seconds,
            model_id: self.metadata.model_id,
        }
    }
}
