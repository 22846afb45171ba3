//! Storage Backends
//!
//! The cache persists its blobs through a narrow slot-oriented interface:
//! named string slots that can be read, written, removed, and listed. The
//! service runs on the file backend; tests run on the in-memory backend,
//! which can also simulate a storage quota.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use thiserror::Error;

// == Backend Error ==
/// Failure raised by a storage backend.
///
/// These never escape the cache's public operations; the cache swallows
/// them and degrades to a miss or a no-op.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Slot name is empty or would escape the backing directory
    #[error("invalid slot name: {0:?}")]
    InvalidSlot(String),

    /// Backend refused the write because its quota is exhausted
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Underlying I/O failure
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

// == Storage Backend Trait ==
/// A named-slot string store, the persistence seam of the cache.
pub trait StorageBackend: Send + Sync {
    /// Reads a slot, returning `None` when it does not exist.
    fn get_item(&self, slot: &str) -> Result<Option<String>, BackendError>;

    /// Writes a slot, replacing any previous content.
    fn set_item(&mut self, slot: &str, value: &str) -> Result<(), BackendError>;

    /// Removes a slot. Removing a missing slot is not an error.
    fn remove_item(&mut self, slot: &str) -> Result<(), BackendError>;

    /// Lists all slot names currently present.
    fn slots(&self) -> Result<Vec<String>, BackendError>;
}

/// Rejects slot names that are empty or contain path-like components.
pub(crate) fn validate_slot(slot: &str) -> Result<(), BackendError> {
    if slot.is_empty() || slot.contains('/') || slot.contains('\\') || slot.contains("..") {
        return Err(BackendError::InvalidSlot(slot.to_string()));
    }
    Ok(())
}
