/*!
 * Pool Source Trait
 * Interface to an externally defined value pool
 */

use crate::core::types::Id;

/// A configured pool of permissible values for one category.
///
/// Implementations must yield candidates in a stable, deterministic,
/// monotonically-advancing order for a given configuration, so that a
/// resumed walk (from a persisted pointer) continues where the previous
/// run left off.
pub trait PoolSource {
    /// Next candidate strictly after `after`, or the first candidate when
    /// `after` is `None`. Returns `None` once the pool is exhausted.
    fn next(&self, after: Option<Id>) -> Option<Id>;

    /// Exclusion-list membership check
    fn excluded(&self, value: Id) -> bool;

    /// True when the pool has no values configured
    fn is_empty(&self) -> bool;
}
