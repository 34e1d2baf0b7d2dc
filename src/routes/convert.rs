//! Conversion route
//!
//! Every method reaches the handler so that rejections keep the JSON error
//! envelope instead of axum's plain-text 405.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use chrono::Utc;

use crate::convert::{ConversionRequest, ConversionResponse};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::public_url;

/// Create the conversion router
pub fn router() -> Router<AppState> {
    Router::new().route("/convert", any(convert))
}

/// POST /convert
///
/// Render HTML to a PDF and return a link that stays valid for the artifact
/// TTL.
async fn convert(State(state): State<AppState>, request: Request) -> Result<Response> {
    let start = Instant::now();
    let received_at = Utc::now();

    // Fallback for routers built without the CORS layer, which answers OPTIONS itself
    if request.method() == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    if request.method() != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let base_url = base_url(state.config().server.public_base_url.as_deref(), request.headers());

    let body = axum::body::to_bytes(request.into_body(), state.config().server.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Failed to read request body");
            AppError::BadRequest("invalid json body".to_string())
        })?;

    let conversion: ConversionRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed conversion request");
        AppError::BadRequest("invalid json body".to_string())
    })?;

    let artifact = state.converter().convert(conversion, received_at).await?;

    let response = ConversionResponse {
        success: true,
        link: public_url(&base_url, &artifact.filename),
        expires_at: artifact.expires_at,
        time_elapsed: i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX),
    };

    Ok(Json(response).into_response())
}

/// Scheme and authority used for download links
fn base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = configured {
        return url.to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}
