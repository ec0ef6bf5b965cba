use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use defense_core::model::SavedProgress;
use tracing::debug;

use crate::repository::{PROGRESS_KEY, ProgressStore, Storage, StorageError, decode, encode};

/// Progress store backed by a single JSON file in a data directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    /// Store the blob as `<dir>/<PROGRESS_KEY>.json`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{PROGRESS_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn save(&self, progress: &SavedProgress) -> Result<(), StorageError> {
        let blob = encode(progress)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "saved progress");
        Ok(())
    }

    fn load(&self) -> Result<Option<SavedProgress>, StorageError> {
        let blob = match fs::read_to_string(&self.path) {
            Ok(blob) => blob,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode(&blob).map(Some)
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared progress");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Storage {
    /// Build a `Storage` that keeps progress under `dir`.
    #[must_use]
    pub fn json_file(dir: impl AsRef<Path>) -> Self {
        Self {
            progress: std::sync::Arc::new(JsonFileProgressStore::in_dir(dir)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonFileProgressStore>();
    }

    #[test]
    fn file_name_uses_progress_key() {
        let store = JsonFileProgressStore::in_dir("/tmp/netdefense");
        assert!(store.path().ends_with("network_defense_game_progress.json"));
    }
}
