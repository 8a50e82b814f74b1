//! `speakers.json`: the ordered index of enrolled profiles.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::profile::SpeakerProfile;
use crate::slug::is_valid_id;

pub(crate) const REGISTRY_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Registry {
    pub version: u32,
    #[serde(default)]
    pub speakers: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RegistryEntry {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub duration: f64,
    pub embedding_dim: usize,
    #[serde(default)]
    pub model: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: REGISTRY_VERSION,
            speakers: Vec::new(),
        }
    }
}

impl Registry {
    /// Reads the registry at `path`. A missing file is an empty registry.
    pub fn load(path: &Path) -> ProfileResult<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let registry: Registry = serde_json::from_slice(&data)?;
        if registry.version != REGISTRY_VERSION {
            return Err(ProfileError::InvalidFormat(format!(
                "registry version {} (want {REGISTRY_VERSION})",
                registry.version
            )));
        }
        if let Some(bad) = registry.speakers.iter().find(|e| !is_valid_id(&e.id)) {
            return Err(ProfileError::InvalidFormat(format!(
                "registry entry has invalid id {:?}",
                bad.id
            )));
        }
        Ok(registry)
    }

    pub fn to_json(&self) -> ProfileResult<Vec<u8>> {
        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');
        Ok(data)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.speakers.iter().position(|e| e.id == id)
    }

    /// Inserts or replaces the entry for `entry.id`, keeping the position
    /// of a replaced entry.
    pub fn upsert(&mut self, entry: RegistryEntry) {
        match self.position(&entry.id) {
            Some(i) => self.speakers[i] = entry,
            None => self.speakers.push(entry),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<RegistryEntry> {
        self.position(id).map(|i| self.speakers.remove(i))
    }
}

impl RegistryEntry {
    pub fn from_profile(p: &SpeakerProfile) -> Self {
        Self {
            id: p.id.clone(),
            name: p.display_name.clone(),
            created: p.created_at,
            audio_file: p.source_audio_ref.clone(),
            duration: p.duration_seconds,
            embedding_dim: p.embedding.len(),
            model: p.model_id.clone(),
        }
    }

    pub fn into_profile(self, embedding: Vec<f32>) -> SpeakerProfile {
        SpeakerProfile {
            id: self.id,
            display_name: self.name,
            embedding,
            created_at: self.created,
            source_audio_ref: self.audio_file,
            duration_seconds: self.duration,
            model_id: self.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> RegistryEntry {
        RegistryEntry {
            id: id.into(),
            name: id.to_uppercase(),
            created: Utc::now(),
            audio_file: format!("samples/{id}.wav"),
            duration: 12.5,
            embedding_dim: 3,
            model: "m".into(),
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reg = Registry::load(&dir.path().join("speakers.json")).unwrap();
        assert_eq!(reg, Registry::default());
    }

    #[test]
    fn upsert_keeps_position() {
        let mut reg = Registry::default();
        reg.upsert(entry("a"));
        reg.upsert(entry("b"));
        reg.upsert(entry("c"));

        let mut replaced = entry("b");
        replaced.name = "Bee".into();
        reg.upsert(replaced);

        let ids: Vec<_> = reg.speakers.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(reg.speakers[1].name, "Bee");
    }

    #[test]
    fn json_field_names() {
        let mut reg = Registry::default();
        reg.upsert(entry("john_doe"));
        let value: serde_json::Value = serde_json::from_slice(&reg.to_json().unwrap()).unwrap();

        assert_eq!(value["version"], 1);
        let s = &value["speakers"][0];
        for key in ["id", "name", "created", "audio_file", "duration", "embedding_dim", "model"] {
            assert!(s.get(key).is_some(), "missing {key}");
        }
        assert_eq!(s["name"], "JOHN_DOE");
    }

    #[test]
    fn rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speakers.json");
        fs::write(&path, br#"{"version":7,"speakers":[]}"#).unwrap();
        assert!(matches!(
            Registry::load(&path),
            Err(ProfileError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_entry_with_path_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speakers.json");
        let mut reg = Registry::default();
        reg.upsert(entry("a"));
        reg.upsert(entry("../outside"));
        fs::write(&path, reg.to_json().unwrap()).unwrap();
        assert!(matches!(
            Registry::load(&path),
            Err(ProfileError::InvalidFormat(_))
        ));
    }
}
