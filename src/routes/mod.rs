//! Route modules for the HTML-to-PDF server

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod convert;
pub mod files;
pub mod health;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(health::router())
        .merge(convert::router())
        .nest("/files", files::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
