//! Directory-backed profile store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/speakers.json   registry, insertion order
//! <root>/<id>.vec        one vector artifact per profile
//! <root>/samples/        archived enrollment audio
//! ```
//!
//! Every call re-reads disk. Writes go to a temp file in the same directory
//! and are renamed into place, vector first, registry second.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive::SampleArchive;
use crate::error::{ProfileError, ProfileResult};
use crate::profile::{NewProfile, SpeakerProfile};
use crate::registry::{Registry, RegistryEntry};
use crate::slug::is_valid_id;
use crate::store::{already_exists, validate_new, ProfileStore};
use crate::vecfile;

/// Registry file name under the store root.
pub const REGISTRY_FILE: &str = "speakers.json";

/// Extension of vector artifacts.
pub const VECTOR_EXT: &str = "vec";

const TMP_EXT: &str = "tmp";
const BACKUP_EXT: &str = "bak";

/// A registry entry whose artifact disagrees with the recorded dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionMismatch {
    pub id: String,
    pub recorded: usize,
    pub actual: usize,
}

/// Result of [`DirStore::verify`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreReport {
    /// Number of registry entries.
    pub profiles: usize,
    /// Vector artifacts with no registry entry.
    pub orphan_vectors: Vec<String>,
    /// Registry entries with no vector artifact.
    pub missing_vectors: Vec<String>,
    pub dimension_mismatches: Vec<DimensionMismatch>,
    /// Artifacts that exist but fail to decode, with the reason.
    pub unreadable_vectors: Vec<(String, String)>,
}

impl StoreReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_vectors.is_empty()
            && self.missing_vectors.is_empty()
            && self.dimension_mismatches.is_empty()
            && self.unreadable_vectors.is_empty()
    }

    /// One-line description of every problem found.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.orphan_vectors.is_empty() {
            parts.push(format!("orphan vectors: {}", self.orphan_vectors.join(", ")));
        }
        if !self.missing_vectors.is_empty() {
            parts.push(format!("missing vectors: {}", self.missing_vectors.join(", ")));
        }
        for m in &self.dimension_mismatches {
            parts.push(format!(
                "{}: registry says dim {}, artifact has {}",
                m.id, m.recorded, m.actual
            ));
        }
        for (id, reason) in &self.unreadable_vectors {
            parts.push(format!("{id}: {reason}"));
        }
        if parts.is_empty() {
            "ok".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Persistent [`ProfileStore`] rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

struct Snapshot {
    registry: Registry,
    vectors: BTreeMap<String, Vec<f32>>,
    report: StoreReport,
}

impl DirStore {
    /// Opens (creating if needed) a store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> ProfileResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "profile store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Archive of enrollment samples kept under this store.
    pub fn archive(&self) -> SampleArchive {
        SampleArchive::new(&self.root)
    }

    /// Absolute path of a profile's `source_audio_ref`.
    pub fn resolve_audio(&self, profile: &SpeakerProfile) -> PathBuf {
        self.archive().resolve(&profile.source_audio_ref)
    }

    /// Checks registry and artifacts against each other without failing on
    /// inconsistency.
    pub fn verify(&self) -> ProfileResult<StoreReport> {
        Ok(self.snapshot()?.report)
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    fn vector_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{VECTOR_EXT}"))
    }

    /// Ids of all `*.vec` files on disk.
    fn vector_ids(&self) -> ProfileResult<HashSet<String>> {
        let mut ids = HashSet::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(VECTOR_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.insert(stem.to_string());
            }
        }
        Ok(ids)
    }

    fn snapshot(&self) -> ProfileResult<Snapshot> {
        let registry = Registry::load(&self.registry_path())?;
        let mut on_disk = self.vector_ids()?;
        let mut vectors = BTreeMap::new();
        let mut report = StoreReport {
            profiles: registry.speakers.len(),
            ..Default::default()
        };

        for entry in &registry.speakers {
            if !on_disk.remove(&entry.id) {
                report.missing_vectors.push(entry.id.clone());
                continue;
            }
            match self.read_vector(&entry.id) {
                Ok(v) if v.len() != entry.embedding_dim => {
                    report.dimension_mismatches.push(DimensionMismatch {
                        id: entry.id.clone(),
                        recorded: entry.embedding_dim,
                        actual: v.len(),
                    });
                }
                Ok(v) => {
                    vectors.insert(entry.id.clone(), v);
                }
                Err(e) => report.unreadable_vectors.push((entry.id.clone(), e.to_string())),
            }
        }

        let mut orphans: Vec<String> = on_disk.into_iter().collect();
        orphans.sort();
        report.orphan_vectors = orphans;

        if !report.is_clean() {
            warn!(root = %self.root.display(), problems = %report.summary(), "profile store inconsistent");
        }
        Ok(Snapshot {
            registry,
            vectors,
            report,
        })
    }

    /// Loads every profile, failing with `Corrupt` if the store is not clean.
    fn load_all(&self) -> ProfileResult<Vec<SpeakerProfile>> {
        let Snapshot {
            registry,
            mut vectors,
            report,
        } = self.snapshot()?;
        if !report.is_clean() {
            return Err(ProfileError::Corrupt(report.summary()));
        }
        let profiles = registry
            .speakers
            .into_iter()
            .map(|entry| {
                let v = vectors.remove(&entry.id).unwrap_or_default();
                entry.into_profile(v)
            })
            .collect();
        Ok(profiles)
    }

    fn read_vector(&self, id: &str) -> ProfileResult<Vec<f32>> {
        let mut f = File::open(self.vector_path(id))?;
        vecfile::load(&mut f)
    }

    fn write_vector(&self, id: &str, v: &[f32]) -> ProfileResult<()> {
        let mut buf = Vec::with_capacity(12 + v.len() * 4);
        vecfile::save(v, &mut buf)?;
        write_atomic(&self.vector_path(id), &buf)
    }

    fn write_registry(&self, registry: &Registry) -> ProfileResult<()> {
        write_atomic(&self.registry_path(), &registry.to_json()?)
    }

    fn backup_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{BACKUP_EXT}"))
    }

    /// Moves the current artifact of `id` aside. Returns the backup path,
    /// or `None` if there was no artifact.
    fn backup_vector(&self, id: &str) -> ProfileResult<Option<PathBuf>> {
        let backup = self.backup_path(id);
        match fs::rename(self.vector_path(id), &backup) {
            Ok(()) => Ok(Some(backup)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Puts the artifact of `id` back to its state before a failed write.
    fn rollback_vector(&self, id: &str, backup: Option<PathBuf>) {
        let path = self.vector_path(id);
        let result = match backup {
            Some(backup) => fs::rename(&backup, &path),
            None => match fs::remove_file(&path) {
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            warn!(id, error = %e, "failed to roll back vector after write failure");
        }
    }
}

impl ProfileStore for DirStore {
    fn create(&self, profile: NewProfile, overwrite: bool) -> ProfileResult<SpeakerProfile> {
        validate_new(&profile)?;
        let mut registry = Registry::load(&self.registry_path())?;
        let existed = registry.position(&profile.id).is_some();
        if existed && !overwrite {
            return Err(already_exists(&profile.id));
        }

        let created = profile.into_profile(Utc::now());
        let backup = if existed {
            self.backup_vector(&created.id)?
        } else {
            None
        };

        if let Err(e) = self.write_vector(&created.id, &created.embedding) {
            self.rollback_vector(&created.id, backup);
            return Err(e);
        }

        registry.upsert(RegistryEntry::from_profile(&created));
        if let Err(e) = self.write_registry(&registry) {
            self.rollback_vector(&created.id, backup);
            return Err(e);
        }

        if let Some(backup) = backup {
            if let Err(e) = fs::remove_file(&backup) {
                warn!(id = %created.id, error = %e, "failed to remove vector backup");
            }
        }

        info!(id = %created.id, dim = created.embedding.len(), overwrite = existed, "profile saved");
        Ok(created)
    }

    fn get(&self, id: &str) -> ProfileResult<Option<SpeakerProfile>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        Ok(self.load_all()?.into_iter().find(|p| p.id == id))
    }

    fn list(&self) -> ProfileResult<Vec<SpeakerProfile>> {
        self.load_all()
    }

    fn delete(&self, id: &str) -> ProfileResult<bool> {
        if !is_valid_id(id) {
            return Ok(false);
        }
        let mut registry = Registry::load(&self.registry_path())?;
        let in_registry = registry.remove(id).is_some();
        let vec_path = self.vector_path(id);

        let vector_removed = match fs::remove_file(&vec_path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if !in_registry {
            if vector_removed {
                warn!(id, "removed orphan vector with no registry entry");
            }
            return Ok(vector_removed);
        }
        if !vector_removed {
            warn!(id, "registry entry had no vector artifact");
        }

        if let Err(e) = self.write_registry(&registry) {
            if vector_removed {
                return Err(ProfileError::PartialDelete {
                    id: id.to_string(),
                    reason: format!("vector removed but registry update failed: {e}"),
                });
            }
            return Err(e);
        }

        info!(id, "profile deleted");
        Ok(true)
    }
}

/// Writes `data` to a sibling temp file and renames it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> ProfileResult<()> {
    let tmp = path.with_extension(TMP_EXT);
    let result = (|| -> std::io::Result<()> {
        let mut f = File::create(&tmp)?;
        f.write_all(data)?;
        f.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    Ok(result?)
}
