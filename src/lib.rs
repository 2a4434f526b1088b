/*!
 * test-ids
 * Stable bin, softbin and test-number allocation for test program generation
 *
 * Draws values from configured pools, honors manually pinned values, and
 * persists allocation state across runs so re-running the same generation
 * produces stable identifiers. Once a pool is exhausted the category
 * permanently switches to reclaiming the least-recently-used value.
 */

pub mod alloc;
pub mod config;
pub mod core;
pub mod pool;
pub mod store;

// Re-exports
pub use crate::alloc::{
    AllocationRequest, Allocator, Assignment, Clock, SystemClock, TestIdentity,
};
pub use crate::config::{AllocatorConfig, CategoryConfig};
pub use crate::core::errors::{AllocError, AllocResult, StoreError, StoreResult};
pub use crate::core::types::{Category, Id, PerCategory, Timestamp};
pub use crate::pool::{PoolAllocator, PoolSource, RangePool};
pub use crate::store::{
    ManualAssignments, Pointer, ReferenceTracker, Store, StoreStats, TestRecord,
};
