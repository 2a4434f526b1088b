/*!
 * Persisted Store
 * In-memory allocation state mirroring the on-disk JSON document
 */

mod types;

pub use types::{ManualAssignments, Pointer, ReferenceTracker, StoreStats, TestRecord};

use crate::core::errors::{StoreError, StoreResult};
use crate::core::types::{Category, PerCategory};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full allocator state: the sole source of truth between requests.
///
/// Four sections, matching the persisted document: test records, manually
/// assigned value sets, sequential pointers and reference timestamps.
/// All mutation stays in memory until an explicit [`Store::save`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub tests: IndexMap<String, TestRecord>,
    #[serde(default)]
    pub manually_assigned: ManualAssignments,
    #[serde(default)]
    pub pointers: PerCategory<Pointer>,
    #[serde(default)]
    pub references: ReferenceTracker,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the document at `path`, or start empty when none exists yet
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            debug!("no store at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_owned(),
            source,
        })?;
        let store: Store = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.to_owned(),
            source,
        })?;
        info!(
            "loaded store from {} ({} tests)",
            path.display(),
            store.tests.len()
        );
        Ok(store)
    }

    /// Serialize the full store to `path`, creating missing parent
    /// directories and overwriting any existing document.
    ///
    /// No partial-write atomicity: a crash mid-write can corrupt the
    /// document, and external backup is assumed.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: path.to_owned(),
                    source,
                })?;
            }
        }
        let raw =
            serde_json::to_string_pretty(self).map_err(|source| StoreError::Serialize {
                path: path.to_owned(),
                source,
            })?;
        fs::write(path, raw).map_err(|source| StoreError::Write {
            path: path.to_owned(),
            source,
        })?;
        info!(
            "saved store to {} ({} tests)",
            path.display(),
            self.tests.len()
        );
        Ok(())
    }

    /// Record for `name`, if one exists
    pub fn record(&self, name: &str) -> Option<&TestRecord> {
        self.tests.get(name)
    }

    /// Record for `name`, created lazily on first use
    pub fn record_mut(&mut self, name: &str) -> &mut TestRecord {
        self.tests.entry(name.to_owned()).or_default()
    }

    /// Point-in-time summary of the store contents
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            tests: self.tests.len(),
            pinned: PerCategory {
                bin: self.manually_assigned.count(Category::Bin),
                softbin: self.manually_assigned.count(Category::Softbin),
                number: self.manually_assigned.count(Category::Number),
            },
            reclaiming: PerCategory {
                bin: self.pointers.bin.is_exhausted(),
                softbin: self.pointers.softbin.is_exhausted(),
                number: self.pointers.number.is_exhausted(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Category;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_sections_default() {
        let store: Store = serde_json::from_str("{}").unwrap();
        assert!(store.tests.is_empty());
        assert_eq!(store.pointers.bin, Pointer::Unset);
    }

    #[test]
    fn test_document_shape() {
        let mut store = Store::new();
        store.record_mut("t1").bin = Some(5);
        store.manually_assigned.pin(Category::Bin, 5);
        store.pointers.softbin = Pointer::Exhausted;
        store.references.touch(Category::Bin, 5, 1.5);

        let doc: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&store).unwrap()).unwrap();
        assert_eq!(doc["tests"]["t1"]["bin"], 5);
        assert_eq!(doc["manually_assigned"]["bin"][0], 5);
        assert_eq!(doc["pointers"]["bin"], serde_json::Value::Null);
        assert_eq!(doc["pointers"]["softbin"], "done");
        assert_eq!(doc["references"]["bin"]["5"], 1.5);
    }

    #[test]
    fn test_stats() {
        let mut store = Store::new();
        store.record_mut("t1");
        store.record_mut("t2");
        store.manually_assigned.pin(Category::Number, 1000);
        store.pointers.bin = Pointer::Exhausted;

        let stats = store.stats();
        assert_eq!(stats.tests, 2);
        assert_eq!(stats.pinned[Category::Number], 1);
        assert_eq!(stats.pinned[Category::Bin], 0);
        assert!(stats.reclaiming[Category::Bin]);
        assert!(!stats.reclaiming[Category::Softbin]);
    }
}
