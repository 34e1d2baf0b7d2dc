//! Conversion Module
//!
//! Orchestrates a single HTML-to-PDF request across the renderer and the
//! artifact store.

pub mod service;
pub mod types;

pub use service::Converter;
pub use types::{ConversionRequest, ConversionResponse};
