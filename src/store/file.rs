use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::PreferenceStore;
use crate::error::StoreError;

/// Preference store backed by a JSON object file.
///
/// The file holds a JSON object. Only string values are preferences this
/// store reads; other entries are kept untouched on write. A missing file
/// reads as empty. A file that is not a JSON object also reads as empty (with
/// a warning) and is replaced on the next write.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the original, so an interrupted write leaves the old file intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Per-user location for `app`: `<config dir>/<app>/preferences.json`.
    ///
    /// Returns `None` when the platform reports no configuration directory.
    pub fn default_path(app: &str) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app).join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!(
                    "ignoring unreadable preference file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Map::new())
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.load()?.remove(key) {
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => {
                log::warn!("preference '{}' is not a string: {}", key, other);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        let content = serde_json::to_string_pretty(&entries)?;

        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        staged.write_all(content.as_bytes()).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged.persist(&self.path).map_err(|e| io_err(e.error))?;
        log::debug!("wrote preference '{}' to {}", key, self.path.display());
        Ok(())
    }
}
