//! File Backend
//!
//! Persists each slot as `<dir>/<slot>.json`. Writes go through a temp file
//! and rename so a crash mid-write leaves the previous content intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{validate_slot, BackendError, StorageBackend};

const SLOT_EXTENSION: &str = "json";

// == File Backend ==
/// Slot store backed by a directory of JSON files.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens (creating if needed) a backend rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, BackendError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slot, SLOT_EXTENSION))
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, slot: &str) -> Result<Option<String>, BackendError> {
        validate_slot(slot)?;

        match fs::read_to_string(self.slot_path(slot)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, slot: &str, value: &str) -> Result<(), BackendError> {
        validate_slot(slot)?;

        let path = self.slot_path(slot);
        let tmp = self.dir.join(format!("{}.{}.tmp", slot, SLOT_EXTENSION));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&mut self, slot: &str) -> Result<(), BackendError> {
        validate_slot(slot)?;

        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn slots(&self) -> Result<Vec<String>, BackendError> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        Ok(names)
    }
}
