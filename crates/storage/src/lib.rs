#![forbid(unsafe_code)]

pub mod file;
pub mod repository;

pub use file::JsonFileProgressStore;
pub use repository::{InMemoryProgressStore, PROGRESS_KEY, ProgressStore, Storage, StorageError};
