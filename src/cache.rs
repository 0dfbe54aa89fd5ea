//! # Parameter Cache
//!
//! Process-local, TTL-based store of the last generated parameter bundle
//! per tenant. Eviction is lazy: staleness is checked on read, stale
//! entries are dropped then, nothing sweeps in the background.
//!
//! No cross-process coherency: in a horizontally scaled deployment each
//! instance holds an independent cache, and a clear issued against one
//! instance does not propagate to siblings.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::params::AnalysisParameters;

/// One cached bundle with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub parameters: AnalysisParameters,
    pub cached_at_epoch_millis: i64,
}

/// Diagnostic counters over the current cache contents. Also surfaced
/// through the engine's stats snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub expired_entries: usize,
}

/// Map from tenant identifier to the last generated bundle.
#[derive(Debug)]
pub struct ParameterCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_millis: i64,
}

impl ParameterCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_millis: ttl.as_millis() as i64,
        }
    }

    /// Return the cached bundle for a tenant if it is still fresh.
    /// A stale entry is removed and treated as a miss.
    pub fn get(&self, tenant_id: &str) -> Option<AnalysisParameters> {
        let now = now_millis();
        let mut entries = self.entries.lock().expect("parameter cache mutex poisoned");

        match entries.get(tenant_id) {
            Some(entry) if now - entry.cached_at_epoch_millis < self.ttl_millis => {
                Some(entry.parameters.clone())
            }
            Some(_) => {
                entries.remove(tenant_id);
                None
            }
            None => None,
        }
    }

    pub fn store(&self, tenant_id: &str, parameters: AnalysisParameters) {
        let entry = CacheEntry {
            parameters,
            cached_at_epoch_millis: now_millis(),
        };
        let mut entries = self.entries.lock().expect("parameter cache mutex poisoned");
        entries.insert(tenant_id.to_string(), entry);
    }

    /// Remove one tenant's entry, or everything when no tenant is given.
    pub fn clear(&self, tenant_id: Option<&str>) {
        let mut entries = self.entries.lock().expect("parameter cache mutex poisoned");
        match tenant_id {
            Some(id) => {
                entries.remove(id);
            }
            None => entries.clear(),
        }
    }

    /// Number of entries currently held, fresh or not.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("parameter cache mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let now = now_millis();
        let entries = self.entries.lock().expect("parameter cache mutex poisoned");
        let fresh = entries
            .values()
            .filter(|e| now - e.cached_at_epoch_millis < self.ttl_millis)
            .count();
        CacheStats {
            total_entries: entries.len(),
            fresh_entries: fresh,
            expired_entries: entries.len() - fresh,
        }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
