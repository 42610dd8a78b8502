//! Storage error handling
//!
//! Every failure surfaced by a store or journal is one of five kinds, each
//! carrying the path it concerns.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document (or compressed source) does not exist and no default was given
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file exists but is not valid JSON
    #[error("Document at '{path}' is corrupted: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configured validator rejected the document
    #[error("Validation failed: document rejected for '{path}'")]
    ValidationFailed { path: PathBuf },

    /// Serializing or renaming the new document failed; the old file is intact
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filesystem or codec failure outside the write path
    #[error("I/O error on '{path}': {source}")]
    IoFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Create an error from an I/O error with path context
    ///
    /// A missing file maps to `NotFound`; everything else is `IoFailed`.
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { path },
            _ => StoreError::IoFailed {
                path,
                source: error,
            },
        }
    }

    /// The path this error concerns
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::NotFound { path }
            | StoreError::Corrupt { path, .. }
            | StoreError::ValidationFailed { path }
            | StoreError::WriteFailed { path, .. }
            | StoreError::IoFailed { path, .. } => path,
        }
    }

    /// Check if the underlying I/O failure is a full disk or exceeded quota
    pub fn is_disk_full(&self) -> bool {
        match self {
            StoreError::WriteFailed { source, .. } | StoreError::IoFailed { source, .. } => {
                is_disk_full_error(source)
            }
            _ => false,
        }
    }

    fn is_permission_denied(&self) -> bool {
        match self {
            StoreError::WriteFailed { source, .. } | StoreError::IoFailed { source, .. } => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        if self.is_disk_full() {
            return Some("Free up disk space and try again.");
        }
        if self.is_permission_denied() {
            return Some("Check file and directory permissions for the store location.");
        }
        match self {
            StoreError::Corrupt { .. } => Some(
                "Restore the document from one of its '_backup_' files, or delete it to start fresh.",
            ),
            StoreError::ValidationFailed { .. } => {
                Some("The document on disk was left unchanged. Fix the data and write again.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
