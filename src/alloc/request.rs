/*!
 * Allocation Request
 * Caller-facing request with alias normalization at the serde boundary
 */

use crate::core::types::{Category, Id};
use serde::{Deserialize, Serialize};

/// Identifier request for one test.
///
/// Alternate spellings used by callers (`sbin`, `test_number`, `tname`,
/// `ix`, ...) are normalized into the canonical fields on deserialization.
/// After allocation the canonical `bin`/`softbin`/`number` fields hold the
/// final resolved values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Id>,

    #[serde(
        default,
        alias = "sbin",
        alias = "soft_bin",
        skip_serializing_if = "Option::is_none"
    )]
    pub softbin: Option<Id>,

    #[serde(
        default,
        alias = "test_number",
        alias = "tnum",
        alias = "testnumber",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<Id>,

    #[serde(
        default,
        alias = "tname",
        alias = "testname",
        alias = "test_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(default, alias = "ix", skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl AllocationRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly supply a bin; it will be honored and pinned
    #[must_use]
    pub fn with_bin(mut self, bin: Id) -> Self {
        self.bin = Some(bin);
        self
    }

    /// Explicitly supply a softbin; it will be honored and pinned
    #[must_use]
    pub fn with_softbin(mut self, softbin: Id) -> Self {
        self.softbin = Some(softbin);
        self
    }

    /// Explicitly supply a test number; it will be honored and pinned
    #[must_use]
    pub fn with_number(mut self, number: Id) -> Self {
        self.number = Some(number);
        self
    }

    /// Override the test name derived from the identity
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Disambiguating index for repeated test names
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub(crate) fn get(&self, category: Category) -> Option<Id> {
        match category {
            Category::Bin => self.bin,
            Category::Softbin => self.softbin,
            Category::Number => self.number,
        }
    }
}

/// Final identifier assignment for one test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub bin: Option<Id>,
    pub softbin: Option<Id>,
    pub number: Option<Id>,
}
