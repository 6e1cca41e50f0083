//! Error types.
//!
//! Table errors are user-recoverable: the caller shows the message and the
//! user retries. Preference errors are never fatal.

use std::io;
use std::path::PathBuf;

use crate::types::Column;

/// Add-record input rejected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty or blank.
    #[error("{field} is required")]
    Missing { field: Column },

    /// Salary was not a non-negative whole number.
    #[error("Salary must be a non-negative whole number, got '{value}'")]
    InvalidSalary { value: String },
}

/// Errors from table operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Removal requested with nothing selected.
    #[error("Please select employees to remove.")]
    EmptySelection,
}

/// Failure reading or writing the preference file.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("cannot access preferences at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid preferences file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
