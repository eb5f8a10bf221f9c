//! File-backed store
//!
//! Each key is written to its own file inside the store directory
//! (`~/.local/share/storefront/` on Linux), so a value survives restarts and
//! two keys never share a file.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Persists values as individual files in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where value files are stored
    dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG-compliant data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "storefront")?;
        Some(Self::with_dir(project_dirs.data_dir().to_path_buf()))
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the value files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key to its file, escaping anything outside `[A-Za-z0-9_-]`
    fn key_path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            match byte {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' => name.push(byte as char),
                _ => name.push_str(&format!("%{:02X}", byte)),
            }
        }
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let to_error = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(to_error)?;

        // Write to a sibling temp file and rename so readers never see a partial value
        let path = self.key_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(to_error)?;
        fs::rename(&tmp, &path).map_err(to_error)
    }
}
