//! Artifact Store Module
//!
//! Short-lived PDF artifacts on local disk:
//! - Collision-resistant filenames (timestamp + hash fingerprint)
//! - Detached per-artifact expiry timers
//! - Startup sweep of files orphaned by a previous process

pub mod artifact_store;
pub mod naming;
pub mod types;

pub use artifact_store::{expires_at, public_url, ArtifactStore};
pub use naming::{build_file_name, fingerprint, sanitize_prefix};
pub use types::*;
