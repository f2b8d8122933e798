use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::LedgerError;
use crate::models::entry::Entry;
use crate::models::settings::LedgerSettings;

use super::format::{self, LoadReport};
use super::store::KeyValueStore;

/// High-level storage operations: save/load the entry collection as one
/// blob under the configured storage key.
#[derive(Clone)]
pub struct StorageManager {
    store: Arc<dyn KeyValueStore>,
    settings: LedgerSettings,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager")
            .field("store", &self.store.name())
            .field("key", &self.settings.storage_key)
            .finish()
    }
}

impl StorageManager {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: LedgerSettings) -> Self {
        Self { store, settings }
    }

    pub fn key(&self) -> &str {
        &self.settings.storage_key
    }

    /// Read and decode the stored collection.
    ///
    /// Flow: store.get(key) → JSON → envelope/version check → per-record shape check.
    /// A missing key is an empty report; rejected records are logged and dropped.
    pub async fn try_load(&self) -> Result<LoadReport, LedgerError> {
        let Some(raw) = self.store.get(self.key()).await? else {
            return Ok(LoadReport {
                version: format::CURRENT_VERSION,
                ..LoadReport::default()
            });
        };

        let report = format::read_entries(&raw, &self.settings)?;
        for rejected in &report.rejected {
            warn!(
                key = self.key(),
                index = rejected.index,
                reason = %rejected.reason,
                "dropping stored record"
            );
        }
        Ok(report)
    }

    /// Like [`try_load`](Self::try_load) but never fails: any error is
    /// logged and yields an empty collection.
    pub async fn load(&self) -> LoadReport {
        match self.try_load().await {
            Ok(report) => {
                info!(
                    key = self.key(),
                    store = self.store.name(),
                    loaded = report.entries.len(),
                    rejected = report.rejected.len(),
                    "entries loaded"
                );
                report
            }
            Err(e) => {
                warn!(key = self.key(), store = self.store.name(), error = %e, "load failed, starting empty");
                LoadReport::default()
            }
        }
    }

    /// Encode and write the whole collection.
    pub async fn save(&self, entries: &[Entry]) -> Result<(), LedgerError> {
        let blob = format::write_entries(entries)?;
        self.store.set(self.key(), blob).await
    }
}
