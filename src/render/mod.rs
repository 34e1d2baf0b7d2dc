//! Render Module
//!
//! HTML-to-PDF rendering behind the [`PdfRenderer`] trait. The server only
//! relies on the contract; [`WkHtmlToPdf`] is the binding used in production.

pub mod provider;
pub mod types;
pub mod wkhtmltopdf;

pub use provider::PdfRenderer;
pub use types::{PageSize, RenderError, RenderOptions};
pub use wkhtmltopdf::{WkHtmlToPdf, WkHtmlToPdfConfig};
