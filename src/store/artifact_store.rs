//! Artifact Store
//!
//! Owns the managed directory. Every persisted artifact gets a detached timer
//! that deletes it once its TTL has elapsed; the filesystem itself is the only
//! registry.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use super::naming::{build_file_name, is_artifact_name, is_servable_name};
use super::types::{Artifact, ReclaimSummary, StoreError};

// ============================================================================
// Artifact Store
// ============================================================================

/// Managed directory of short-lived PDF artifacts
#[derive(Clone)]
pub struct ArtifactStore {
    inner: Arc<ArtifactStoreInner>,
}

struct ArtifactStoreInner {
    /// Directory holding every artifact
    dir: PathBuf,

    /// Lifetime applied to each artifact
    ttl: Duration,

    /// Mixed into fingerprints so names allocated in one clock tick differ
    sequence: AtomicU64,
}

impl ArtifactStore {
    /// Create a store over an existing directory
    pub fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(ArtifactStoreInner {
                dir,
                ttl,
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Create the directory if needed and return a store over it
    pub async fn open(dir: PathBuf, ttl: Duration) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        tracing::info!(dir = %dir.display(), ttl_secs = ttl.as_secs(), "Artifact store ready");

        Ok(Self::new(dir, ttl))
    }

    /// Managed directory
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Lifetime of each artifact
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Allocate a fresh artifact filename for `prefix`
    pub fn allocate_name(&self, prefix: &str) -> String {
        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed);
        build_file_name(prefix, Utc::now(), sequence)
    }

    /// Write bytes under the managed directory
    ///
    /// A failed write leaves nothing behind.
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.inner.dir.join(filename);

        if let Err(source) = tokio::fs::write(&path, bytes).await {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial artifact");
                }
            }
            return Err(StoreError::Write { path, source });
        }

        Ok(path)
    }

    /// Delete `path` once `ttl` has elapsed
    ///
    /// The returned handle never needs to be awaited.
    pub fn schedule_expiry(&self, path: PathBuf, ttl: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            remove_artifact(&path).await;
        })
    }

    /// Write an artifact and start its expiry timer
    pub async fn persist(
        &self,
        filename: String,
        bytes: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<Artifact, StoreError> {
        let path = self.write(&filename, bytes).await?;
        let created_at = Utc::now();

        self.schedule_expiry(path.clone(), self.inner.ttl);

        tracing::debug!(
            filename = %filename,
            size = bytes.len(),
            expires_at = %expires_at,
            "Artifact persisted"
        );

        Ok(Artifact {
            filename,
            path,
            created_at,
            expires_at,
        })
    }

    /// Map a requested filename to its path, if the name is acceptable
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        is_servable_name(filename).then(|| self.inner.dir.join(filename))
    }

    /// Read an artifact by name; `None` once it has expired or never existed
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(path) = self.resolve(filename) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Deal with artifacts left behind by a previous process
    ///
    /// Only names in the artifact format are touched. Files older than the TTL are removed now; younger ones get a timer for
    /// the time they have left.
    pub async fn reclaim_stale(&self) -> Result<ReclaimSummary, StoreError> {
        let scan_err = |source| StoreError::Scan {
            path: self.inner.dir.clone(),
            source,
        };

        let mut summary = ReclaimSummary::default();
        let mut entries = tokio::fs::read_dir(&self.inner.dir).await.map_err(scan_err)?;

        while let Some(entry) = entries.next_entry().await.map_err(scan_err)? {
            let path = entry.path();
            let owned = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_artifact_name);
            if !owned {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .unwrap_or_default();

            if age >= self.inner.ttl {
                if remove_artifact(&path).await {
                    summary.removed += 1;
                }
            } else {
                self.schedule_expiry(path, self.inner.ttl - age);
                summary.rescheduled += 1;
            }
        }

        if summary.removed > 0 || summary.rescheduled > 0 {
            tracing::info!(
                removed = summary.removed,
                rescheduled = summary.rescheduled,
                "Reclaimed artifacts from previous run"
            );
        }

        Ok(summary)
    }
}

/// `now + ttl`
pub fn expires_at(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    let ttl = chrono::Duration::milliseconds(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX));
    now.checked_add_signed(ttl).unwrap_or(now)
}

/// Public download link for an artifact
pub fn public_url(base_url: &str, filename: &str) -> String {
    format!("{}/files/{}", base_url.trim_end_matches('/'), filename)
}

/// Remove an artifact file; returns whether this call removed it
async fn remove_artifact(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Expired artifact removed");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove expired artifact");
            false
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
