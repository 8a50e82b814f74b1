//! Path utilities for voxid.

use std::io;
use std::path::{Path, PathBuf};

/// Default base directory name under the user's home.
pub const DEFAULT_BASE_DIR: &str = ".voxid";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default profile store directory name.
pub const DEFAULT_STORE_DIR: &str = "speakers";

/// Provides access to the voxid directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    /// User's home directory.
    pub home_dir: PathBuf,
}

impl Paths {
    /// Resolves paths against the current user's home directory.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self { home_dir })
    }

    /// Resolves paths against an explicit home directory.
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
        }
    }

    /// Returns the base directory (~/.voxid).
    pub fn base_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_BASE_DIR)
    }

    /// Returns the config file path (~/.voxid/config.yaml).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir().join(DEFAULT_CONFIG_FILE)
    }

    /// Returns the default profile store (~/.voxid/speakers).
    pub fn store_dir(&self) -> PathBuf {
        self.base_dir().join(DEFAULT_STORE_DIR)
    }

    /// Creates the base directory if it doesn't exist.
    pub fn ensure_base_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.base_dir())
    }

    /// Expands a leading `~/` against the home directory.
    pub fn expand(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => self.home_dir.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_new() {
        let paths = Paths::new().unwrap();
        assert!(!paths.home_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_paths_structure() {
        let paths = Paths::with_home("/home/u");

        assert_eq!(paths.base_dir(), PathBuf::from("/home/u/.voxid"));
        assert_eq!(paths.config_file(), PathBuf::from("/home/u/.voxid/config.yaml"));
        assert_eq!(paths.store_dir(), PathBuf::from("/home/u/.voxid/speakers"));
    }

    #[test]
    fn test_expand() {
        let paths = Paths::with_home("/home/u");
        assert_eq!(paths.expand(Path::new("~/voices")), PathBuf::from("/home/u/voices"));
        assert_eq!(paths.expand(Path::new("/abs/voices")), PathBuf::from("/abs/voices"));
        assert_eq!(paths.expand(Path::new("rel")), PathBuf::from("rel"));
    }
}
