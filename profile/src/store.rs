use crate::error::{ProfileError, ProfileResult};
use crate::profile::{NewProfile, SpeakerProfile};
use crate::slug::is_valid_id;

/// ProfileStore persists enrolled speaker profiles keyed by id.
///
/// `list` returns profiles in insertion order; overwriting an id keeps its
/// position. Implementations must be safe to share (Send + Sync) but make no
/// promise about concurrent writers in different processes.
pub trait ProfileStore: Send + Sync {
    /// Creates a profile. Fails with [`ProfileError::Validation`] on a bad id
    /// or embedding, or when the id exists and `overwrite` is false.
    fn create(&self, profile: NewProfile, overwrite: bool) -> ProfileResult<SpeakerProfile>;

    /// Returns the profile with the given id, if any.
    fn get(&self, id: &str) -> ProfileResult<Option<SpeakerProfile>>;

    /// Returns all profiles in store order.
    fn list(&self) -> ProfileResult<Vec<SpeakerProfile>>;

    /// Removes a profile. Returns false if no such id existed.
    fn delete(&self, id: &str) -> ProfileResult<bool>;

    /// Reports whether a profile with the given id exists.
    fn contains(&self, id: &str) -> ProfileResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Returns the number of stored profiles.
    fn len(&self) -> ProfileResult<usize> {
        Ok(self.list()?.len())
    }

    /// Returns true if the store holds no profiles.
    fn is_empty(&self) -> ProfileResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Checks the parts of a [`NewProfile`] every store requires.
pub(crate) fn validate_new(profile: &NewProfile) -> ProfileResult<()> {
    if profile.id.is_empty() {
        return Err(ProfileError::Validation("profile id is empty".into()));
    }
    if !is_valid_id(&profile.id) {
        return Err(ProfileError::Validation(format!(
            "profile id {:?} must match [a-z0-9_]+",
            profile.id
        )));
    }
    if profile.embedding.is_empty() {
        return Err(ProfileError::Validation(format!(
            "profile {:?} has an empty embedding",
            profile.id
        )));
    }
    if profile.embedding.iter().any(|v| !v.is_finite()) {
        return Err(ProfileError::Validation(format!(
            "profile {:?} has a non-finite embedding value",
            profile.id
        )));
    }
    Ok(())
}

pub(crate) fn already_exists(id: &str) -> ProfileError {
    ProfileError::Validation(format!(
        "profile '{id}' already exists (overwrite not confirmed)"
    ))
}
