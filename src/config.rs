/*!
 * Allocator Configuration
 * Per-category pool definitions and derivation flags
 */

use crate::core::types::Category;
use crate::pool::RangePool;

/// Configuration for a single identifier category
#[derive(Debug, Clone, Default)]
pub struct CategoryConfig {
    /// Pool of permissible values for automatic issuance
    pub pool: RangePool,
    /// Whether this category is derived from earlier categories.
    /// Derived categories are regenerated whenever an earlier category
    /// is cleared and regenerated.
    pub derived: bool,
}

impl CategoryConfig {
    #[must_use]
    pub fn new(pool: RangePool) -> Self {
        Self {
            pool,
            derived: false,
        }
    }

    /// Mark this category as derived from earlier categories
    #[must_use]
    pub fn derived(mut self) -> Self {
        self.derived = true;
        self
    }
}

/// Full allocator configuration, one entry per category.
///
/// Categories left unconfigured have empty pools and are never assigned
/// automatically.
#[derive(Debug, Clone, Default)]
pub struct AllocatorConfig {
    pub bins: CategoryConfig,
    pub softbins: CategoryConfig,
    pub numbers: CategoryConfig,
}

impl AllocatorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bins(mut self, config: CategoryConfig) -> Self {
        self.bins = config;
        self
    }

    #[must_use]
    pub fn with_softbins(mut self, config: CategoryConfig) -> Self {
        self.softbins = config;
        self
    }

    #[must_use]
    pub fn with_numbers(mut self, config: CategoryConfig) -> Self {
        self.numbers = config;
        self
    }

    pub fn category(&self, category: Category) -> &CategoryConfig {
        match category {
            Category::Bin => &self.bins,
            Category::Softbin => &self.softbins,
            Category::Number => &self.numbers,
        }
    }
}
