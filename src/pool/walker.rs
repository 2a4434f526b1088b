/*!
 * Pool Allocator
 * Sequential issuance with sticky least-recently-used reclamation
 */

use super::traits::PoolSource;
use crate::core::errors::AllocResult;
use crate::core::types::{Category, Id};
use crate::store::{Pointer, Store};
use log::{debug, warn};

/// One allocation step for a single category.
///
/// Walks the pool sequentially from the persisted pointer, rejecting
/// candidates that are manually pinned or excluded by the pool
/// configuration. Once the pool reports exhaustion the category switches
/// permanently to reclaim mode, reissuing the least-recently-referenced
/// value. The same implementation serves all three categories.
pub struct PoolAllocator<'a> {
    category: Category,
    pool: &'a dyn PoolSource,
}

impl<'a> PoolAllocator<'a> {
    pub fn new(category: Category, pool: &'a dyn PoolSource) -> Self {
        Self { category, pool }
    }

    /// Produce the next value for this category, or `None` when the pool
    /// is unconfigured.
    pub fn allocate(&self, store: &mut Store) -> AllocResult<Option<Id>> {
        if self.pool.is_empty() {
            return Ok(None);
        }
        if store.pointers[self.category].is_exhausted() {
            return self.reclaim(store).map(Some);
        }

        let mut candidate = self.pool.next(store.pointers[self.category].last_issued());
        while let Some(value) = candidate {
            if store.manually_assigned.is_pinned(self.category, value)
                || self.pool.excluded(value)
            {
                candidate = self.pool.next(Some(value));
                continue;
            }
            store.pointers[self.category] = Pointer::At(value);
            return Ok(Some(value));
        }

        // Nothing left to issue; all future generation switches to reclaim
        warn!(
            "{} pool exhausted, switching to least-recently-used reclamation",
            self.category
        );
        store.pointers[self.category] = Pointer::Exhausted;
        self.reclaim(store).map(Some)
    }

    fn reclaim(&self, store: &mut Store) -> AllocResult<Id> {
        let value = store.references.oldest(self.category)?;
        debug!("reclaimed {} {}", self.category, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AllocError;
    use crate::pool::RangePool;

    #[test]
    fn test_sequential_issue_advances_pointer() {
        let pool = RangePool::new().include(1..=3);
        let mut store = Store::new();
        let alloc = PoolAllocator::new(Category::Bin, &pool);

        assert_eq!(alloc.allocate(&mut store).unwrap(), Some(1));
        assert_eq!(store.pointers[Category::Bin], Pointer::At(1));
        assert_eq!(alloc.allocate(&mut store).unwrap(), Some(2));
        assert_eq!(store.pointers[Category::Bin], Pointer::At(2));
    }

    #[test]
    fn test_unconfigured_pool_yields_nothing() {
        let pool = RangePool::new();
        let mut store = Store::new();

        let issued = PoolAllocator::new(Category::Number, &pool)
            .allocate(&mut store)
            .unwrap();
        assert_eq!(issued, None);
        assert_eq!(store.pointers[Category::Number], Pointer::Unset);
    }

    #[test]
    fn test_pinned_and_excluded_candidates_are_skipped() {
        let pool = RangePool::new().include(1..=5).exclude_value(2);
        let mut store = Store::new();
        store.manually_assigned.pin(Category::Bin, 1);
        store.manually_assigned.pin(Category::Bin, 3);

        let issued = PoolAllocator::new(Category::Bin, &pool)
            .allocate(&mut store)
            .unwrap();
        assert_eq!(issued, Some(4));
    }

    #[test]
    fn test_exhaustion_is_sticky_and_reclaims_oldest() {
        let pool = RangePool::new().include(1..=2);
        let mut store = Store::new();
        let alloc = PoolAllocator::new(Category::Bin, &pool);

        assert_eq!(alloc.allocate(&mut store).unwrap(), Some(1));
        store.references.touch(Category::Bin, 1, 10.0);
        assert_eq!(alloc.allocate(&mut store).unwrap(), Some(2));
        store.references.touch(Category::Bin, 2, 11.0);

        // Third request exhausts the pool and immediately reclaims
        assert_eq!(alloc.allocate(&mut store).unwrap(), Some(1));
        assert_eq!(store.pointers[Category::Bin], Pointer::Exhausted);
        store.references.touch(Category::Bin, 1, 12.0);

        // Reclaim rotates through the least recently referenced value
        assert_eq!(alloc.allocate(&mut store).unwrap(), Some(2));
        assert_eq!(store.pointers[Category::Bin], Pointer::Exhausted);
    }

    #[test]
    fn test_reclaim_without_history_fails() {
        // Every value pinned up front: exhaustion with an empty tracker
        let pool = RangePool::new().include_value(1);
        let mut store = Store::new();
        store.manually_assigned.pin(Category::Softbin, 1);

        let result = PoolAllocator::new(Category::Softbin, &pool).allocate(&mut store);
        assert!(matches!(
            result,
            Err(AllocError::EmptyCategory(Category::Softbin))
        ));
    }
}
