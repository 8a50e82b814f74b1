//! Archived copies of enrollment audio.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::error::{ProfileError, ProfileResult};

/// Directory under the store root holding archived samples.
pub const SAMPLES_DIR: &str = "samples";

/// SampleArchive copies enrollment audio under `<root>/samples` and hands
/// out root-relative references. Existing files are never overwritten: a
/// colliding name gets a `_YYYYMMDD_HHMMSS` suffix.
#[derive(Debug, Clone)]
pub struct SampleArchive {
    root: PathBuf,
}

impl SampleArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(SAMPLES_DIR)
    }

    /// Copies `src` into the archive and returns its reference.
    pub fn store(&self, src: &Path) -> ProfileResult<String> {
        let file_name = src
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ProfileError::Validation(format!("invalid sample path {}", src.display()))
            })?;

        let dir = self.dir();
        fs::create_dir_all(&dir)?;

        let name = self.free_name(&dir, src, file_name);
        fs::copy(src, dir.join(&name))?;

        let reference = format!("{SAMPLES_DIR}/{name}");
        debug!(src = %src.display(), reference = %reference, "sample archived");
        Ok(reference)
    }

    /// Absolute path of an archive reference.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }

    /// Removes an archived sample. Returns false if it was already gone.
    pub fn remove(&self, reference: &str) -> ProfileResult<bool> {
        match fs::remove_file(self.resolve(reference)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn free_name(&self, dir: &Path, src: &Path, file_name: &str) -> String {
        if !dir.join(file_name).exists() {
            return file_name.to_string();
        }

        let stem = src.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
        let ext = src
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let stamp = Local::now().format("%Y%m%d_%H%M%S");

        let candidate = format!("{stem}_{stamp}{ext}");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        // same second, same name
        let mut n = 2;
        loop {
            let candidate = format!("{stem}_{stamp}_{n}{ext}");
            if !dir.join(&candidate).exists() {
                return candidate;
            }
            n += 1;
        }
    }
}
