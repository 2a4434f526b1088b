/*!
 * Error Types
 * Centralized error handling with thiserror and miette support
 */

use crate::core::types::Category;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for allocation operations
pub type AllocResult<T> = Result<T, AllocError>;

/// Result type for store persistence operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Allocation errors
#[derive(Error, Debug, Diagnostic)]
pub enum AllocError {
    #[error("Could not determine a test name from the supplied identity")]
    #[diagnostic(
        code(alloc::identity_unresolved),
        help("Pass an explicit `name` in the request, or an identity that exposes one.")
    )]
    IdentityUnresolved,

    #[error("No {0} has ever been issued, nothing to reclaim")]
    #[diagnostic(
        code(alloc::empty_category),
        help("A pool reported exhaustion before any value was issued. Check the pool configuration.")
    )]
    EmptyCategory(Category),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

/// Store persistence errors
#[derive(Error, Debug, Diagnostic)]
pub enum StoreError {
    #[error("Failed to read store at {path}")]
    #[diagnostic(
        code(store::read_failed),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store at {path}")]
    #[diagnostic(
        code(store::write_failed),
        help("Check permissions and free space on the target directory.")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store at {path} is not a valid document")]
    #[diagnostic(
        code(store::parse_failed),
        help("The persisted document is corrupt. Restore it from backup, or delete it to start fresh.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize store for {path}")]
    #[diagnostic(code(store::serialize_failed))]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Path of the document involved in the failure
    pub fn path(&self) -> &std::path::Path {
        match self {
            StoreError::Read { path, .. }
            | StoreError::Write { path, .. }
            | StoreError::Parse { path, .. }
            | StoreError::Serialize { path, .. } => path,
        }
    }
}
