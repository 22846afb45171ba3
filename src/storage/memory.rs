//! In-Memory Backend
//!
//! HashMap-backed slot store for tests and ephemeral runs. An optional byte
//! quota makes storage-full rejection reproducible.

use std::collections::HashMap;

use super::{validate_slot, BackendError, StorageBackend};

// == Memory Backend ==
/// Slot store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
    /// Total bytes of stored values allowed, None = unbounded
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    /// Creates an unbounded in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects writes once total stored bytes would
    /// exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn stored_bytes_excluding(&self, slot: &str) -> usize {
        self.slots
            .iter()
            .filter(|(name, _)| name.as_str() != slot)
            .map(|(_, value)| value.len())
            .sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, slot: &str) -> Result<Option<String>, BackendError> {
        validate_slot(slot)?;
        Ok(self.slots.get(slot).cloned())
    }

    fn set_item(&mut self, slot: &str, value: &str) -> Result<(), BackendError> {
        validate_slot(slot)?;

        if let Some(quota) = self.quota_bytes {
            if self.stored_bytes_excluding(slot) + value.len() > quota {
                return Err(BackendError::QuotaExceeded);
            }
        }

        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, slot: &str) -> Result<(), BackendError> {
        validate_slot(slot)?;
        self.slots.remove(slot);
        Ok(())
    }

    fn slots(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.slots.keys().cloned().collect())
    }
}
