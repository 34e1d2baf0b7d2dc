//! HTML-to-PDF Server Library
//!
//! Renders HTML to PDF, keeps the result on local disk for a fixed lifetime
//! and serves it over a temporary link. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `store`: Short-lived artifact files (naming, expiry, startup sweep)
//! - `render`: The HTML-to-PDF renderer boundary and its wkhtmltopdf binding
//! - `convert`: Request orchestration across renderer and store
//! - `routes`: HTTP surface (`/convert`, `/files`, `/health`)

pub mod config;
pub mod convert;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;
