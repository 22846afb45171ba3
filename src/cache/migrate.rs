//! Legacy Slot Migration
//!
//! Older deployments persisted each metric under its own prefixed slot
//! instead of one aggregated blob. A one-time sweep at startup folds those
//! slots into the blob and deletes the originals. Running it again finds no
//! prefixed slots left and does nothing, so the sweep is idempotent.

use tracing::{debug, info, warn};

use crate::cache::entry::measured_size;
use crate::cache::{MetricEntry, MetricsCache, LEGACY_SLOT_PREFIX};
use crate::storage::StorageBackend;

impl MetricsCache {
    // == Migrate Legacy Slots ==
    /// Folds every `metric_cache_*` slot into the aggregated blob.
    ///
    /// A key already present in the blob wins over its legacy copy. Legacy
    /// slots are removed whether or not their content was usable, so
    /// corrupt leftovers cannot resurface. Returns the number of entries
    /// moved into the blob.
    pub fn migrate_legacy_slots(&mut self) -> usize {
        let slots = match self.backend().slots() {
            Ok(slots) => slots,
            Err(e) => {
                warn!(error = %e, "legacy migration skipped, cannot list slots");
                return 0;
            }
        };

        let legacy: Vec<String> = slots
            .into_iter()
            .filter(|slot| slot.starts_with(LEGACY_SLOT_PREFIX))
            .collect();
        if legacy.is_empty() {
            return 0;
        }

        let mut raw = match self.load_raw_store() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "legacy migration skipped, store unreadable");
                return 0;
            }
        };

        let mut moved = 0;
        for slot in legacy {
            let key = slot[LEGACY_SLOT_PREFIX.len()..].to_string();

            match self.read_legacy_entry(&slot) {
                Some(entry) if !key.is_empty() && !raw.contains_key(&key) => {
                    match serde_json::to_value(&entry) {
                        Ok(encoded) => {
                            raw.insert(key, encoded);
                            moved += 1;
                        }
                        Err(e) => debug!(slot = %slot, error = %e, "legacy entry not re-encodable"),
                    }
                }
                Some(_) => debug!(slot = %slot, "legacy entry superseded by aggregated blob"),
                None => debug!(slot = %slot, "legacy slot undecodable, dropping"),
            }

            // Remove the legacy slot regardless; the sweep must not run twice
            // over the same data
            if let Err(e) = self.backend_mut().remove_item(&slot) {
                warn!(slot = %slot, error = %e, "legacy slot not removed");
            }
        }

        if moved > 0 {
            if let Err(e) = self.persist_raw_store(&raw) {
                warn!(error = %e, "migrated entries not persisted");
                return 0;
            }
        }

        info!(moved, "legacy cache slots migrated");
        moved
    }

    /// Decodes one legacy slot. The recorded `size` is trusted when present;
    /// only a missing size is recomputed from the payload.
    fn read_legacy_entry(&self, slot: &str) -> Option<MetricEntry> {
        let text = self.backend().get_item(slot).ok().flatten()?;
        let mut entry: MetricEntry = serde_json::from_str(&text).ok()?;
        if entry.size == 0 {
            entry.size = measured_size(&entry.data);
        }
        Some(entry)
    }
}
