/*!
 * Core Types
 * Common types used across the allocator
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Identifier value type (bins, softbins and test numbers)
pub type Id = u32;

/// Reference timestamp in seconds since the Unix epoch
pub type Timestamp = f64;

/// The three identifier categories assigned to every test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bin,
    Softbin,
    Number,
}

impl Category {
    /// All categories in their fixed resolution order
    pub const ALL: [Category; 3] = [Category::Bin, Category::Softbin, Category::Number];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bin => "bin",
            Category::Softbin => "softbin",
            Category::Number => "number",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot per category, indexable by `Category`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    pub bin: T,
    pub softbin: T,
    pub number: T,
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        match category {
            Category::Bin => &self.bin,
            Category::Softbin => &self.softbin,
            Category::Number => &self.number,
        }
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Bin => &mut self.bin,
            Category::Softbin => &mut self.softbin,
            Category::Number => &mut self.number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", Category::Bin), "bin");
        assert_eq!(format!("{}", Category::Softbin), "softbin");
        assert_eq!(format!("{}", Category::Number), "number");
    }

    #[test]
    fn test_per_category_indexing() {
        let mut slots = PerCategory::<u32>::default();
        slots[Category::Softbin] = 7;

        assert_eq!(slots[Category::Bin], 0);
        assert_eq!(slots[Category::Softbin], 7);
        assert_eq!(slots.softbin, 7);
    }
}
