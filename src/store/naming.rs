//! Artifact Naming
//!
//! Filenames look like `{prefix}_{YYYYMMDD_HHMMSS}_{fingerprint}.pdf`, where the
//! fingerprint is a truncated SHA-256 over the prefix, a nanosecond clock
//! reading and a per-store sequence number.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::types::{ARTIFACT_EXTENSION, DEFAULT_PREFIX, FINGERPRINT_LEN, MAX_PREFIX_LEN};

/// Build a filename from its parts
pub fn build_file_name(prefix: &str, now: DateTime<Utc>, sequence: u64) -> String {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));

    format!(
        "{}_{}_{}.{}",
        prefix,
        now.format("%Y%m%d_%H%M%S"),
        fingerprint(prefix, nanos, sequence),
        ARTIFACT_EXTENSION
    )
}

/// Short hex digest used to keep filenames apart
pub fn fingerprint(prefix: &str, nanos: i64, sequence: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}_{}", prefix, nanos, sequence).as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

/// Normalize a client-supplied prefix into something safe for a filename
///
/// Empty prefixes fall back to [`DEFAULT_PREFIX`]. Anything outside
/// `[A-Za-z0-9_-]` becomes `_`.
pub fn sanitize_prefix(prefix: &str) -> String {
    let cleaned: String = prefix
        .chars()
        .take(MAX_PREFIX_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        cleaned
    }
}

/// Whether a requested name can map to a file inside the managed directory
pub fn is_servable_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains("..")
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Whether a filename has the shape produced by [`build_file_name`]
pub fn is_artifact_name(filename: &str) -> bool {
    let Some(stem) = filename
        .strip_suffix(ARTIFACT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };

    // Prefixes may contain `_`, so split from the right
    let mut parts = stem.rsplitn(4, '_');
    let (Some(fp), Some(time), Some(date), Some(prefix)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    fp.len() == FINGERPRINT_LEN
        && fp.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
        && time.len() == 6
        && time.chars().all(|c| c.is_ascii_digit())
        && date.len() == 8
        && date.chars().all(|c| c.is_ascii_digit())
        && !prefix.is_empty()
        && prefix.len() <= MAX_PREFIX_LEN
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
