//! Artifact Store Types

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

// ============================================================================
// Constants
// ============================================================================

/// Lifetime of every generated artifact
pub const ARTIFACT_TTL: Duration = Duration::from_secs(5 * 60);

/// Prefix used when the client does not supply one
pub const DEFAULT_PREFIX: &str = "file";

/// Maximum prefix length kept in a filename
pub const MAX_PREFIX_LEN: usize = 64;

/// Number of hex characters kept from the fingerprint digest
pub const FINGERPRINT_LEN: usize = 10;

/// Extension of every artifact on disk
pub const ARTIFACT_EXTENSION: &str = "pdf";

// ============================================================================
// Artifact
// ============================================================================

/// A rendered PDF persisted under the managed directory
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Unique filename, also the public URL segment
    pub filename: String,

    /// Full path on disk
    pub path: PathBuf,

    /// When the file was written
    pub created_at: DateTime<Utc>,

    /// When the file becomes eligible for deletion
    pub expires_at: DateTime<Utc>,
}

/// Outcome of the startup sweep over the managed directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReclaimSummary {
    /// Files already past their lifetime and removed immediately
    pub removed: usize,

    /// Files still alive that got a fresh expiry timer
    pub rescheduled: usize,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors from the artifact store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan storage directory {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
