//! Conversion Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /convert`
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionRequest {
    #[serde(default)]
    pub html: String,

    #[serde(default)]
    pub prefix: String,
}

/// Successful conversion envelope
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResponse {
    pub success: bool,
    pub link: String,
    pub expires_at: DateTime<Utc>,
    /// Milliseconds from handler entry to just before encoding
    pub time_elapsed: i64,
}
