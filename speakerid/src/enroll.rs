//! Profile creation from a voice sample.

use std::path::Path;

use tracing::{debug, info, warn};
use voxid_audio::AudioConverter;
use voxid_profile::{derive_id, NewProfile, ProfileError, ProfileMetadata, ProfileStore, SampleArchive, SpeakerProfile};
use voxid_voiceprint::{VoiceprintError, VoiceprintModel};

use crate::error::{Result, SpeakerIdError};

/// Enrollment sample length bounds, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollConfig {
    /// Shorter samples are rejected.
    pub min_duration_secs: f64,

    /// Longer samples are cut to their first `max_duration_secs`.
    pub max_duration_secs: f64,
}

impl Default for EnrollConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: 10.0,
            max_duration_secs: 60.0,
        }
    }
}

impl EnrollConfig {
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_duration_secs, self.max_duration_secs);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max <= 0.0 || min > max {
            return Err(SpeakerIdError::Config(format!(
                "enrollment duration bounds [{min}, {max}] are invalid"
            )));
        }
        Ok(())
    }
}

/// Result of [`Enroller::enroll`].
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollOutcome {
    Enrolled(SpeakerProfile),
    /// The id already existed and overwriting was declined. Nothing changed.
    Cancelled { existing: SpeakerProfile },
}

/// Enroller turns a voice sample into a stored profile.
///
/// Extraction happens before anything is written, so a failing extractor
/// leaves the store and the archive untouched.
pub struct Enroller<'a> {
    model: &'a dyn VoiceprintModel,
    converter: &'a dyn AudioConverter,
    store: &'a dyn ProfileStore,
    archive: &'a SampleArchive,
    config: EnrollConfig,
}

impl<'a> Enroller<'a> {
    pub fn new(
        model: &'a dyn VoiceprintModel,
        converter: &'a dyn AudioConverter,
        store: &'a dyn ProfileStore,
        archive: &'a SampleArchive,
        config: EnrollConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            converter,
            store,
            archive,
            config,
        })
    }

    /// Enrolls `audio_path` under `display_name`.
    ///
    /// `confirm` is asked whether to replace an existing profile with the
    /// same id; it is not called otherwise.
    pub fn enroll<F>(&self, audio_path: &Path, display_name: &str, confirm: F) -> Result<EnrollOutcome>
    where
        F: FnOnce(&SpeakerProfile) -> bool,
    {
        if !audio_path.is_file() {
            return Err(SpeakerIdError::Validation(format!(
                "audio file not found: {}",
                audio_path.display()
            )));
        }

        let duration = self.converter.probe_duration(audio_path)?;
        if duration < self.config.min_duration_secs {
            return Err(SpeakerIdError::Validation(format!(
                "sample is {duration:.1}s, at least {:.0}s required",
                self.config.min_duration_secs
            )));
        }

        let id = derive_id(display_name).map_err(|e| match e {
            ProfileError::Validation(msg) => SpeakerIdError::Validation(msg),
            other => SpeakerIdError::Store(other),
        })?;

        let mut overwrite = false;
        if let Some(existing) = self.store.get(&id)? {
            if !confirm(&existing) {
                info!(id = %id, "enrollment cancelled, existing profile kept");
                return Ok(EnrollOutcome::Cancelled { existing });
            }
            overwrite = true;
        }

        let mut pcm = self.converter.to_canonical(audio_path)?;
        if pcm.truncate_secs(self.config.max_duration_secs) {
            debug!(
                id = %id,
                duration,
                max = self.config.max_duration_secs,
                "sample truncated"
            );
        }

        let embedding = self.model.extract(pcm.samples(), pcm.sample_rate())?;
        if embedding.len() != self.model.dimension() {
            return Err(VoiceprintError::DimensionMismatch {
                expected: self.model.dimension(),
                got: embedding.len(),
            }
            .into());
        }

        let reference = self.archive.store(audio_path)?;
        let metadata = ProfileMetadata {
            source_audio_ref: reference.clone(),
            duration_seconds: duration.min(self.config.max_duration_secs),
            model_id: self.model.model_id().to_string(),
        };
        let created = match self
            .store
            .create(NewProfile::new(&id, display_name.trim(), embedding, metadata), overwrite)
        {
            Ok(p) => p,
            Err(e) => {
                if let Err(rm) = self.archive.remove(&reference) {
                    warn!(reference = %reference, error = %rm, "failed to remove archived sample");
                }
                return Err(e.into());
            }
        };

        info!(
            id = %created.id,
            name = %created.display_name,
            duration = created.duration_seconds,
            model = %created.model_id,
            "speaker enrolled"
        );
        Ok(EnrollOutcome::Enrolled(created))
    }
}
