use std::sync::RwLock;

use chrono::Utc;

use crate::error::ProfileResult;
use crate::profile::{NewProfile, SpeakerProfile};
use crate::store::{already_exists, validate_new, ProfileStore};

/// MemoryStore is an in-process [`ProfileStore`].
/// Intended for tests and for callers that already hold a profile set.
pub struct MemoryStore {
    profiles: RwLock<Vec<SpeakerProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(Vec::new()),
        }
    }

    /// Builds a store that lists `profiles` in the given order.
    pub fn with_profiles(profiles: Vec<SpeakerProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for MemoryStore {
    fn create(&self, profile: NewProfile, overwrite: bool) -> ProfileResult<SpeakerProfile> {
        validate_new(&profile)?;
        let mut profiles = self.profiles.write().unwrap();
        let created = profile.into_profile(Utc::now());

        match profiles.iter_mut().find(|p| p.id == created.id) {
            Some(_) if !overwrite => Err(already_exists(&created.id)),
            Some(existing) => {
                *existing = created.clone();
                Ok(created)
            }
            None => {
                profiles.push(created.clone());
                Ok(created)
            }
        }
    }

    fn get(&self, id: &str) -> ProfileResult<Option<SpeakerProfile>> {
        let profiles = self.profiles.read().unwrap();
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    fn list(&self) -> ProfileResult<Vec<SpeakerProfile>> {
        Ok(self.profiles.read().unwrap().clone())
    }

    fn delete(&self, id: &str) -> ProfileResult<bool> {
        let mut profiles = self.profiles.write().unwrap();
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        Ok(profiles.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::profile::ProfileMetadata;

    fn new_profile(id: &str, name: &str) -> NewProfile {
        NewProfile::new(id, name, vec![1.0, 0.0, 0.0], ProfileMetadata::default())
    }

    #[test]
    fn create_get_list_delete() {
        let store = MemoryStore::new();
        store.create(new_profile("a", "A"), false).unwrap();
        store.create(new_profile("b", "B"), false).unwrap();

        assert_eq!(store.get("a").unwrap().unwrap().display_name, "A");
        assert!(store.get("zzz").unwrap().is_none());

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn duplicate_requires_overwrite() {
        let store = MemoryStore::new();
        store.create(new_profile("a", "A"), false).unwrap();
        store.create(new_profile("b", "B"), false).unwrap();

        let err = store.create(new_profile("a", "Again"), false).unwrap_err();
        assert!(matches!(err, ProfileError::Validation(_)));

        store.create(new_profile("a", "Again"), true).unwrap();
        let list = store.list().unwrap();
        assert_eq!(list[0].id, "a");
        assert_eq!(list[0].display_name, "Again");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn rejects_bad_input() {
        let store = MemoryStore::new();
        assert!(store.create(new_profile("", "Empty"), false).is_err());
        let mut p = new_profile("x", "X");
        p.embedding.clear();
        assert!(store.create(p, false).is_err());
        assert!(store.is_empty().unwrap());
    }
}
