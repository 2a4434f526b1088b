/*!
 * Allocation Orchestrator
 * Per-request merge of manual overrides, cascades and pool issuance
 */

mod clock;
mod identity;
mod request;

pub use clock::{Clock, SystemClock};
pub use identity::TestIdentity;
pub use request::{AllocationRequest, Assignment};

use crate::config::AllocatorConfig;
use crate::core::errors::{AllocResult, StoreResult};
use crate::core::types::Category;
use crate::pool::PoolAllocator;
use crate::store::Store;
use log::{debug, info};
use std::path::PathBuf;

/// Identifier allocator with an explicit open/save lifecycle.
///
/// Owns the persisted store for the lifetime of a generation run. All
/// allocation state lives in the store; nothing is retained between
/// requests anywhere else. Saving to durable storage is a separate,
/// explicit call.
pub struct Allocator {
    config: AllocatorConfig,
    store: Store,
    path: Option<PathBuf>,
    clock: Box<dyn Clock>,
}

impl Allocator {
    /// Open an allocator backed by the document at `path`.
    ///
    /// Loads existing state when the document is present, otherwise starts
    /// empty. The document is only written on [`Allocator::save`].
    pub fn open(config: AllocatorConfig, path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let store = Store::load(&path)?;
        info!("allocator opened on {}", path.display());
        Ok(Self {
            config,
            store,
            path: Some(path),
            clock: Box::new(SystemClock),
        })
    }

    /// Open an allocator with no backing document; [`Allocator::save`]
    /// becomes a no-op.
    #[must_use]
    pub fn in_memory(config: AllocatorConfig) -> Self {
        Self {
            config,
            store: Store::new(),
            path: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the time source (tests use a deterministic clock)
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Persist the current store to the backing document
    pub fn save(&self) -> StoreResult<()> {
        match &self.path {
            Some(path) => self.store.save(path),
            None => Ok(()),
        }
    }

    /// Assign bin, softbin and number for one test.
    ///
    /// Explicitly supplied values are honored and pinned against future
    /// automatic issuance. A value the record already holds is regenerated
    /// if it has since been pinned elsewhere, cascading through derived
    /// categories. Remaining gaps are filled from the pools in fixed
    /// bin, softbin, number order. The canonical fields of `request` are
    /// overwritten with the final values, which are also returned.
    pub fn allocate(
        &mut self,
        identity: &dyn TestIdentity,
        request: &mut AllocationRequest,
    ) -> AllocResult<Assignment> {
        let name = identity::resolve_name(identity, request.name.as_deref(), request.index)?;

        // Manual overrides first, then pin-collision clearing with the
        // forward cascade through derived categories.
        for category in Category::ALL {
            if let Some(value) = request.get(category) {
                self.store.record_mut(&name).set(category, Some(value));
                self.store.manually_assigned.pin(category, value);
            } else if self.pinned_elsewhere(&name, category) {
                self.clear_with_cascade(&name, category);
            }
        }

        // Fill whatever is still missing from the pools
        for category in Category::ALL {
            if self.store.record_mut(&name).get(category).is_none() {
                let pool = &self.config.category(category).pool;
                let issued = PoolAllocator::new(category, pool).allocate(&mut self.store)?;
                if let Some(value) = issued {
                    debug!("issued {category} {value} for test `{name}`");
                    self.store.record_mut(&name).set(category, Some(value));
                }
            }
        }

        // Stamp a reference for every category that ended with a value,
        // cycling reclaimed values to the back of the reclamation queue
        let record = *self.store.record_mut(&name);
        let time = self.clock.now();
        for category in Category::ALL {
            if let Some(value) = record.get(category) {
                self.store.references.touch(category, value, time);
            }
        }

        request.bin = record.bin;
        request.softbin = record.softbin;
        request.number = record.number;
        Ok(Assignment {
            bin: record.bin,
            softbin: record.softbin,
            number: record.number,
        })
    }

    /// Whether the record's current value for `category` has since been
    /// pinned by some other caller
    fn pinned_elsewhere(&self, name: &str, category: Category) -> bool {
        self.store
            .record(name)
            .and_then(|record| record.get(category))
            .is_some_and(|value| self.store.manually_assigned.is_pinned(category, value))
    }

    /// Clear a category so it regenerates, along with every later category
    /// configured as derived from earlier ones
    fn clear_with_cascade(&mut self, name: &str, category: Category) {
        let softbin_derived = self.config.softbins.derived;
        let number_derived = self.config.numbers.derived;
        let record = self.store.record_mut(name);
        record.set(category, None);
        match category {
            Category::Bin => {
                if softbin_derived {
                    record.set(Category::Softbin, None);
                }
                if number_derived {
                    record.set(Category::Number, None);
                }
            }
            Category::Softbin => {
                if number_derived {
                    record.set(Category::Number, None);
                }
            }
            Category::Number => {}
        }
        debug!("cleared {category} for `{name}`, value was pinned elsewhere");
    }
}
