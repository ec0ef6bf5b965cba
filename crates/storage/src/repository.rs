use std::sync::{Arc, Mutex};

use defense_core::model::{ProgressError, SavedProgress};
use thiserror::Error;

/// Fixed key under which the in-progress session is stored.
pub const PROGRESS_KEY: &str = "network_defense_game_progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid saved progress: {0}")]
    Invalid(#[from] ProgressError),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Durable slot for a single in-progress session.
///
/// Implementations hold at most one blob. `save` overwrites it, `clear` is a
/// no-op when nothing is stored.
pub trait ProgressStore: Send + Sync {
    /// Persist the snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or written.
    fn save(&self, progress: &SavedProgress) -> Result<(), StorageError>;

    /// Load the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unreadable blobs and
    /// `StorageError::Invalid` for blobs that cannot be resumed.
    fn load(&self) -> Result<Option<SavedProgress>, StorageError>;

    /// Remove the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium refuses the removal.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Encode a snapshot as the persisted JSON blob.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode(progress: &SavedProgress) -> Result<String, StorageError> {
    serde_json::to_string(progress).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decode and validate a persisted JSON blob.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::Invalid` when the snapshot fails validation.
pub fn decode(blob: &str) -> Result<SavedProgress, StorageError> {
    let progress: SavedProgress =
        serde_json::from_str(blob).map_err(|err| StorageError::Serialization(err.to_string()))?;
    progress.validate()?;
    Ok(progress)
}

/// In-memory store holding the serialized blob, for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressStore {
    blob: Arc<Mutex<Option<String>>>,
}

impl InMemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored blob, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    /// Overwrite the stored blob verbatim.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, blob: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(blob.into());
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blob.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn save(&self, progress: &SavedProgress) -> Result<(), StorageError> {
        let blob = encode(progress)?;
        self.put_raw(blob)
    }

    fn load(&self) -> Result<Option<SavedProgress>, StorageError> {
        self.raw()?.as_deref().map(decode).transpose()
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.take();
        Ok(())
    }
}

/// Aggregates the progress store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryProgressStore::new()),
        }
    }
}
