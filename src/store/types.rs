/*!
 * Store Types
 * Shapes of the persisted allocation document
 */

use crate::core::errors::{AllocError, AllocResult};
use crate::core::types::{Category, Id, PerCategory, Timestamp};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Document tag for an exhausted pool pointer
const EXHAUSTED_TAG: &str = "done";

/// Identifier assignments for one named test.
///
/// An absent category value means the category has not been assigned yet
/// (or its pool is unconfigured).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub softbin: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<Id>,
}

impl TestRecord {
    pub fn get(&self, category: Category) -> Option<Id> {
        match category {
            Category::Bin => self.bin,
            Category::Softbin => self.softbin,
            Category::Number => self.number,
        }
    }

    pub fn set(&mut self, category: Category, value: Option<Id>) {
        match category {
            Category::Bin => self.bin = value,
            Category::Softbin => self.softbin = value,
            Category::Number => self.number = value,
        }
    }
}

/// Sequential issue pointer for one category.
///
/// Persisted as `null` (unset), the last issued value, or the string
/// `"done"` once the pool has been exhausted. Exhaustion is permanent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pointer {
    /// No value issued yet; the walk starts from the beginning of the pool
    #[default]
    Unset,
    /// Last sequentially issued value; the walk resumes after it
    At(Id),
    /// Pool exhausted; the category reclaims instead of walking
    Exhausted,
}

impl Pointer {
    /// Resume point for the sequential walk
    pub fn last_issued(&self) -> Option<Id> {
        match self {
            Pointer::At(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Pointer::Exhausted)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Pointer::Unset => serializer.serialize_none(),
            Pointer::At(value) => serializer.serialize_u32(*value),
            Pointer::Exhausted => serializer.serialize_str(EXHAUSTED_TAG),
        }
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Value(Id),
            Tag(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Pointer::Unset),
            Some(Raw::Value(value)) => Ok(Pointer::At(value)),
            Some(Raw::Tag(tag)) if tag == EXHAUSTED_TAG => Ok(Pointer::Exhausted),
            Some(Raw::Tag(tag)) => Err(de::Error::custom(format!(
                "unknown pointer tag `{tag}`"
            ))),
        }
    }
}

/// Values explicitly pinned by callers, per category.
///
/// A value enters a set the moment a caller supplies it explicitly; pins
/// are permanent for the lifetime of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualAssignments {
    sets: PerCategory<IndexSet<Id>>,
}

impl ManualAssignments {
    /// Record an explicit assignment; idempotent
    pub fn pin(&mut self, category: Category, value: Id) {
        if self.sets[category].insert(value) {
            debug!("pinned {category} {value}");
        }
    }

    pub fn is_pinned(&self, category: Category, value: Id) -> bool {
        self.sets[category].contains(&value)
    }

    pub fn count(&self, category: Category) -> usize {
        self.sets[category].len()
    }
}

/// Last-use timestamps per concrete value, per category.
///
/// The sole basis for reclamation ordering: the value with the oldest
/// stamp is reclaimed first. Refreshing a value moves it to the back of
/// the map, so equal stamps still resolve in a stable order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTracker {
    stamps: PerCategory<IndexMap<Id, Timestamp>>,
}

impl ReferenceTracker {
    /// Record that `value` was assigned at `time`
    pub fn touch(&mut self, category: Category, value: Id, time: Timestamp) {
        let stamps = &mut self.stamps[category];
        stamps.shift_remove(&value);
        stamps.insert(value, time);
    }

    /// Least-recently-referenced value for the category.
    ///
    /// Fails when nothing has ever been referenced, which can only happen
    /// if reclaim is reached without a single successful issue.
    pub fn oldest(&self, category: Category) -> AllocResult<Id> {
        let mut best: Option<(Id, Timestamp)> = None;
        for (&value, &time) in &self.stamps[category] {
            match best {
                Some((_, t)) if time >= t => {}
                _ => best = Some((value, time)),
            }
        }
        best.map(|(value, _)| value)
            .ok_or(AllocError::EmptyCategory(category))
    }

    pub fn count(&self, category: Category) -> usize {
        self.stamps[category].len()
    }
}

/// Point-in-time store summary for logging and operator inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of test records held
    pub tests: usize,
    /// Pinned value counts per category
    pub pinned: PerCategory<usize>,
    /// Which categories have entered reclaim mode
    pub reclaiming: PerCategory<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_document_encoding() {
        assert_eq!(serde_json::to_string(&Pointer::Unset).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Pointer::At(12)).unwrap(), "12");
        assert_eq!(
            serde_json::to_string(&Pointer::Exhausted).unwrap(),
            "\"done\""
        );

        assert_eq!(
            serde_json::from_str::<Pointer>("null").unwrap(),
            Pointer::Unset
        );
        assert_eq!(
            serde_json::from_str::<Pointer>("12").unwrap(),
            Pointer::At(12)
        );
        assert_eq!(
            serde_json::from_str::<Pointer>("\"done\"").unwrap(),
            Pointer::Exhausted
        );
        assert!(serde_json::from_str::<Pointer>("\"bogus\"").is_err());
    }

    #[test]
    fn test_pin_is_idempotent() {
        let mut manual = ManualAssignments::default();
        manual.pin(Category::Bin, 5);
        manual.pin(Category::Bin, 5);

        assert!(manual.is_pinned(Category::Bin, 5));
        assert!(!manual.is_pinned(Category::Softbin, 5));
        assert_eq!(manual.count(Category::Bin), 1);
    }

    #[test]
    fn test_oldest_prefers_earliest_stamp() {
        let mut refs = ReferenceTracker::default();
        refs.touch(Category::Bin, 1, 10.0);
        refs.touch(Category::Bin, 2, 11.0);
        refs.touch(Category::Bin, 3, 12.0);

        assert_eq!(refs.oldest(Category::Bin).unwrap(), 1);

        // Refreshing cycles the value to the back of the queue
        refs.touch(Category::Bin, 1, 13.0);
        assert_eq!(refs.oldest(Category::Bin).unwrap(), 2);
    }

    #[test]
    fn test_oldest_breaks_stamp_ties_by_refresh_order() {
        let mut refs = ReferenceTracker::default();
        refs.touch(Category::Bin, 1, 10.0);
        refs.touch(Category::Bin, 2, 10.0);
        refs.touch(Category::Bin, 1, 10.0);

        // Value 1 was refreshed last, so 2 is now the oldest
        assert_eq!(refs.oldest(Category::Bin).unwrap(), 2);
    }

    #[test]
    fn test_oldest_on_untouched_category_fails() {
        let refs = ReferenceTracker::default();
        assert!(matches!(
            refs.oldest(Category::Number),
            Err(AllocError::EmptyCategory(Category::Number))
        ));
    }

    #[test]
    fn test_record_category_access() {
        let mut record = TestRecord::default();
        record.set(Category::Softbin, Some(100));

        assert_eq!(record.get(Category::Bin), None);
        assert_eq!(record.get(Category::Softbin), Some(100));
        record.set(Category::Softbin, None);
        assert_eq!(record.get(Category::Softbin), None);
    }
}
